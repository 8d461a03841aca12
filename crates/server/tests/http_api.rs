use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, ServerState};
use service::client::{
    SheetDescriptor, SheetsApi, SheetsConnector, SpreadsheetSummary, UpdateOutcome,
};
use service::errors::ServiceError;
use service::sheets::SheetsService;

/// Stub upstream: records which calls the handlers issue and can be told to
/// fail a given call.
#[derive(Default)]
struct StubSheets {
    fail_update: bool,
    fail_get: bool,
    updated_cells: u32,
    summary: Option<SpreadsheetSummary>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SheetsConnector for StubSheets {
    async fn connect(&self) -> Result<Box<dyn SheetsApi>, ServiceError> {
        self.calls.lock().unwrap().push("connect".into());
        Ok(Box::new(StubClient {
            fail_update: self.fail_update,
            fail_get: self.fail_get,
            updated_cells: self.updated_cells,
            summary: self.summary.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct StubClient {
    fail_update: bool,
    fail_get: bool,
    updated_cells: u32,
    summary: Option<SpreadsheetSummary>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SheetsApi for StubClient {
    async fn clear_values(&self, _spreadsheet_id: &str, range: &str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(format!("clear {range}"));
        Ok(())
    }

    async fn update_values(
        &self,
        _spreadsheet_id: &str,
        range: &str,
        _values: Vec<Vec<Value>>,
    ) -> Result<UpdateOutcome, ServiceError> {
        self.calls.lock().unwrap().push(format!("update {range}"));
        if self.fail_update {
            return Err(ServiceError::Api("quota exceeded".into()));
        }
        Ok(UpdateOutcome {
            updated_cells: self.updated_cells,
        })
    }

    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetSummary, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("get {spreadsheet_id}"));
        if self.fail_get {
            return Err(ServiceError::Api("permission denied".into()));
        }
        Ok(self.summary.clone().unwrap_or(SpreadsheetSummary {
            title: "Untitled".into(),
            sheets: Vec::new(),
        }))
    }
}

struct TestApp {
    base_url: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl TestApp {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

async fn start_server(stub: StubSheets) -> anyhow::Result<TestApp> {
    let calls = Arc::clone(&stub.calls);
    let state = ServerState {
        sheets: SheetsService::new(Arc::new(stub)),
    };
    let app: Router = routes::build_router(CorsLayer::very_permissive(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, calls })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = start_server(StubSheets::default()).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn write_without_spreadsheet_id_is_400() -> anyhow::Result<()> {
    let app = start_server(StubSheets::default()).await?;
    let res = client()
        .post(format!("{}/write-to-sheets", app.base_url))
        .json(&json!({"csv_data": [["a", "b"]]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["error"].is_string());
    assert!(app.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn write_without_csv_data_is_400() -> anyhow::Result<()> {
    let app = start_server(StubSheets::default()).await?;
    let res = client()
        .post(format!("{}/write-to-sheets", app.base_url))
        .json(&json!({"spreadsheet_id": "sid"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn write_reports_updated_cells_and_url() -> anyhow::Result<()> {
    let app = start_server(StubSheets {
        updated_cells: 6,
        ..Default::default()
    })
    .await?;
    let res = client()
        .post(format!("{}/write-to-sheets", app.base_url))
        .json(&json!({
            "spreadsheet_id": "sid-123",
            "csv_data": [{"a": "1", "b": "2"}, {"a": "3"}],
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["updated_cells"], 6);
    assert_eq!(
        body["spreadsheet_url"],
        "https://docs.google.com/spreadsheets/d/sid-123"
    );
    assert_eq!(
        app.calls(),
        vec!["connect", "clear Sheet1!A:Z", "update Sheet1!A1"]
    );
    Ok(())
}

#[tokio::test]
async fn write_with_clear_disabled_skips_the_clear_call() -> anyhow::Result<()> {
    let app = start_server(StubSheets::default()).await?;
    let res = client()
        .post(format!("{}/write-to-sheets", app.base_url))
        .json(&json!({
            "spreadsheet_id": "sid",
            "sheet_name": "Data",
            "csv_data": [["x", "y"]],
            "clear_existing": false,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.calls(), vec!["connect", "update Data!A1"]);
    Ok(())
}

#[tokio::test]
async fn write_upstream_failure_is_500_with_details() -> anyhow::Result<()> {
    let app = start_server(StubSheets {
        fail_update: true,
        ..Default::default()
    })
    .await?;
    let res = client()
        .post(format!("{}/write-to-sheets", app.base_url))
        .json(&json!({"spreadsheet_id": "sid", "csv_data": [["x"]]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
    assert!(body["details"].is_string());
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn connection_test_without_id_skips_metadata() -> anyhow::Result<()> {
    let app = start_server(StubSheets::default()).await?;
    let res = client()
        .get(format!("{}/test-connection", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert!(body["note"].is_string());
    assert_eq!(app.calls(), vec!["connect"]);
    Ok(())
}

#[tokio::test]
async fn connection_test_with_id_reports_title_and_count() -> anyhow::Result<()> {
    let app = start_server(StubSheets {
        summary: Some(SpreadsheetSummary {
            title: "Budget".into(),
            sheets: vec![SheetDescriptor {
                sheet_id: 0,
                title: "Sheet1".into(),
                index: 0,
                sheet_type: "GRID".into(),
            }],
        }),
        ..Default::default()
    })
    .await?;
    let res = client()
        .get(format!(
            "{}/test-connection?spreadsheet_id=sid",
            app.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["spreadsheet_title"], "Budget");
    assert_eq!(body["sheet_count"], 1);
    assert_eq!(app.calls(), vec!["connect", "get sid"]);
    Ok(())
}

#[tokio::test]
async fn sheet_info_without_id_is_400() -> anyhow::Result<()> {
    let app = start_server(StubSheets::default()).await?;
    let res = client()
        .get(format!("{}/get-sheet-info", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["error"].is_string());
    assert!(app.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn sheet_info_lists_sheets() -> anyhow::Result<()> {
    let app = start_server(StubSheets {
        summary: Some(SpreadsheetSummary {
            title: "Budget".into(),
            sheets: vec![
                SheetDescriptor {
                    sheet_id: 0,
                    title: "Sheet1".into(),
                    index: 0,
                    sheet_type: "GRID".into(),
                },
                SheetDescriptor {
                    sheet_id: 99,
                    title: "Charts".into(),
                    index: 1,
                    sheet_type: "OBJECT".into(),
                },
            ],
        }),
        ..Default::default()
    })
    .await?;
    let res = client()
        .get(format!(
            "{}/get-sheet-info?spreadsheet_id=sid",
            app.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["spreadsheet_title"], "Budget");
    assert_eq!(body["spreadsheet_id"], "sid");
    assert_eq!(body["sheets"].as_array().unwrap().len(), 2);
    assert_eq!(body["sheets"][0]["title"], "Sheet1");
    assert_eq!(body["sheets"][1]["sheet_id"], 99);
    assert_eq!(body["sheets"][1]["sheet_type"], "OBJECT");
    assert_eq!(
        body["spreadsheet_url"],
        "https://docs.google.com/spreadsheets/d/sid"
    );
    Ok(())
}

#[tokio::test]
async fn sheet_info_upstream_failure_is_500() -> anyhow::Result<()> {
    let app = start_server(StubSheets {
        fail_get: true,
        ..Default::default()
    })
    .await?;
    let res = client()
        .get(format!(
            "{}/get-sheet-info?spreadsheet_id=sid",
            app.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["error"].is_string());
    assert!(body["details"].is_string());
    Ok(())
}
