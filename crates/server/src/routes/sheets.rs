use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use service::client::SheetDescriptor;
use service::sheets::{ConnectionReport, SheetsService, WriteRequest};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub sheets: SheetsService,
}

#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: String,
    pub updated_cells: u32,
    pub spreadsheet_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SpreadsheetQuery {
    pub spreadsheet_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SheetEntry {
    pub sheet_id: i32,
    pub title: String,
    pub index: i32,
    pub sheet_type: String,
}

impl From<SheetDescriptor> for SheetEntry {
    fn from(d: SheetDescriptor) -> Self {
        Self {
            sheet_id: d.sheet_id,
            title: d.title,
            index: d.index,
            sheet_type: d.sheet_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SheetInfoResponse {
    pub success: bool,
    pub spreadsheet_title: String,
    pub spreadsheet_id: String,
    pub sheets: Vec<SheetEntry>,
    pub spreadsheet_url: String,
}

/// POST /write-to-sheets
pub async fn write_to_sheets(
    State(state): State<ServerState>,
    Json(input): Json<WriteRequest>,
) -> Result<Json<WriteResponse>, ApiError> {
    let outcome = state.sheets.write_table(input).await?;
    Ok(Json(WriteResponse {
        success: true,
        message: format!("{} cells updated", outcome.updated_cells),
        updated_cells: outcome.updated_cells,
        spreadsheet_url: outcome.spreadsheet_url,
    }))
}

/// GET /test-connection?spreadsheet_id=
pub async fn test_connection(
    State(state): State<ServerState>,
    Query(query): Query<SpreadsheetQuery>,
) -> Result<Json<Value>, ApiError> {
    let report = state
        .sheets
        .test_connection(query.spreadsheet_id.as_deref())
        .await?;
    let body = match report {
        ConnectionReport::AuthOnly => json!({
            "success": true,
            "message": "Google Sheets API authentication is working",
            "note": "pass spreadsheet_id to also test access to a specific spreadsheet",
        }),
        ConnectionReport::Spreadsheet {
            title,
            sheet_count,
            spreadsheet_url,
        } => json!({
            "success": true,
            "message": "Google Sheets API connection test succeeded",
            "spreadsheet_title": title,
            "sheet_count": sheet_count,
            "spreadsheet_url": spreadsheet_url,
        }),
    };
    Ok(Json(body))
}

/// GET /get-sheet-info?spreadsheet_id=
pub async fn get_sheet_info(
    State(state): State<ServerState>,
    Query(query): Query<SpreadsheetQuery>,
) -> Result<Json<SheetInfoResponse>, ApiError> {
    let spreadsheet_id = query.spreadsheet_id;
    let details = state
        .sheets
        .sheet_info(spreadsheet_id.as_deref())
        .await?;
    Ok(Json(SheetInfoResponse {
        success: true,
        spreadsheet_title: details.title,
        spreadsheet_id: spreadsheet_id.unwrap_or_default(),
        sheets: details.sheets.into_iter().map(SheetEntry::from).collect(),
        spreadsheet_url: details.spreadsheet_url,
    }))
}
