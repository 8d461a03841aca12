use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

/// Result of a values-update call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub updated_cells: u32,
}

/// Properties of one sheet tab inside a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDescriptor {
    pub sheet_id: i32,
    pub title: String,
    pub index: i32,
    pub sheet_type: String,
}

/// Spreadsheet metadata as returned by the upstream `get` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetSummary {
    pub title: String,
    pub sheets: Vec<SheetDescriptor>,
}

/// The upstream calls the operations need. Object-safe so tests can swap in
/// a recording stub.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Blank a rectangular range ahead of a full rewrite.
    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<(), ServiceError>;

    /// Write a grid of cell values starting at the given range, with literal
    /// (non-formula) value semantics.
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<UpdateOutcome, ServiceError>;

    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetSummary, ServiceError>;
}

/// Exchanges stored credentials for a client handle. Connecting is its own
/// seam because the connection test must succeed without touching any
/// spreadsheet.
#[async_trait]
pub trait SheetsConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn SheetsApi>, ServiceError>;
}

/// Deep link to a spreadsheet document.
pub fn spreadsheet_url(spreadsheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}")
}
