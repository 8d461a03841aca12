use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::client::{spreadsheet_url, SheetDescriptor, SheetsConnector};
use crate::errors::ServiceError;
use crate::table::TableData;

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Body of the write endpoint. Required fields stay optional at the serde
/// boundary so a missing one surfaces as our own validation error instead of
/// a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest {
    pub spreadsheet_id: Option<String>,
    pub sheet_name: Option<String>,
    pub csv_data: Option<TableData>,
    pub clear_existing: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub updated_cells: u32,
    pub spreadsheet_url: String,
}

/// Result of the connection test, with or without a target spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionReport {
    AuthOnly,
    Spreadsheet {
        title: String,
        sheet_count: usize,
        spreadsheet_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetDetails {
    pub title: String,
    pub sheets: Vec<SheetDescriptor>,
    pub spreadsheet_url: String,
}

/// The three operations over the connector seam. Stateless: every call
/// exchanges credentials for a fresh client handle.
#[derive(Clone)]
pub struct SheetsService {
    connector: Arc<dyn SheetsConnector>,
}

impl SheetsService {
    pub fn new(connector: Arc<dyn SheetsConnector>) -> Self {
        Self { connector }
    }

    /// Write tabular data into a sheet, optionally clearing `A:Z` first.
    /// A clear that succeeded before a failed write is not undone; callers
    /// must treat the whole operation as failed.
    pub async fn write_table(&self, req: WriteRequest) -> Result<WriteOutcome, ServiceError> {
        let spreadsheet_id = req
            .spreadsheet_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ServiceError::required("spreadsheet_id"))?;
        let data = match req.csv_data {
            Some(data) if !data.is_empty() => data,
            _ => return Err(ServiceError::required("csv_data")),
        };
        let sheet_name = req
            .sheet_name
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());
        let clear_existing = req.clear_existing.unwrap_or(true);

        let client = self.connector.connect().await?;

        if clear_existing {
            let clear_range = format!("{sheet_name}!A:Z");
            client.clear_values(&spreadsheet_id, &clear_range).await?;
        }

        let range = format!("{sheet_name}!A1");
        let outcome = client
            .update_values(&spreadsheet_id, &range, data.into_grid())
            .await?;

        info!(
            spreadsheet_id = %spreadsheet_id,
            sheet_name = %sheet_name,
            updated_cells = outcome.updated_cells,
            "sheet updated"
        );
        Ok(WriteOutcome {
            updated_cells: outcome.updated_cells,
            spreadsheet_url: spreadsheet_url(&spreadsheet_id),
        })
    }

    /// Without a spreadsheet id this only proves a client can be constructed
    /// from the stored credentials; with one it also fetches that
    /// spreadsheet's metadata.
    pub async fn test_connection(
        &self,
        spreadsheet_id: Option<&str>,
    ) -> Result<ConnectionReport, ServiceError> {
        let client = self.connector.connect().await?;
        match spreadsheet_id.filter(|id| !id.trim().is_empty()) {
            None => Ok(ConnectionReport::AuthOnly),
            Some(id) => {
                let summary = client.get_spreadsheet(id).await?;
                Ok(ConnectionReport::Spreadsheet {
                    title: summary.title,
                    sheet_count: summary.sheets.len(),
                    spreadsheet_url: spreadsheet_url(id),
                })
            }
        }
    }

    /// Metadata for every sheet tab in the spreadsheet.
    pub async fn sheet_info(
        &self,
        spreadsheet_id: Option<&str>,
    ) -> Result<SpreadsheetDetails, ServiceError> {
        let id = spreadsheet_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("spreadsheet_id parameter is required".into()))?;

        let client = self.connector.connect().await?;
        let summary = client.get_spreadsheet(id).await?;
        Ok(SpreadsheetDetails {
            title: summary.title,
            sheets: summary.sheets,
            spreadsheet_url: spreadsheet_url(id),
        })
    }
}
