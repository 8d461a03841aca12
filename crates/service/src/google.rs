use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use google_sheets4::api::{ClearValuesRequest, ValueRange};
use google_sheets4::{hyper, hyper_rustls, oauth2, Sheets};
use serde_json::Value;
use tracing::debug;

use crate::client::{
    SheetDescriptor, SheetsApi, SheetsConnector, SpreadsheetSummary, UpdateOutcome,
};
use crate::credentials::ServiceAccountCredentials;
use crate::errors::ServiceError;

type SheetsHub = Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

/// Live connector over the Google Sheets v4 API. Holds the injected key
/// material and builds a fresh authenticated hub on every `connect`, so the
/// client handle stays request-scoped.
pub struct GoogleSheetsConnector {
    credentials: ServiceAccountCredentials,
    timeout: Duration,
}

impl GoogleSheetsConnector {
    pub fn new(credentials: ServiceAccountCredentials, timeout: Duration) -> Self {
        Self {
            credentials,
            timeout,
        }
    }
}

#[async_trait]
impl SheetsConnector for GoogleSheetsConnector {
    async fn connect(&self) -> Result<Box<dyn SheetsApi>, ServiceError> {
        let key = oauth2::parse_service_account_key(self.credentials.json()).map_err(|e| {
            ServiceError::Configuration(format!("invalid service-account key: {e}"))
        })?;
        let auth = oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| {
                ServiceError::Configuration(format!("failed to build authenticator: {e}"))
            })?;

        let roots = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| {
                ServiceError::Configuration(format!("failed to load native roots: {e}"))
            })?;
        let client = hyper::Client::builder().build(roots.https_or_http().enable_http1().build());
        debug!("authenticated Google Sheets hub constructed");
        Ok(Box::new(GoogleSheetsClient {
            hub: Sheets::new(client, auth),
            timeout: self.timeout,
        }))
    }
}

struct GoogleSheetsClient {
    hub: SheetsHub,
    timeout: Duration,
}

impl GoogleSheetsClient {
    /// Upstream calls carry no timeout of their own; enforce ours and surface
    /// an elapsed deadline as an upstream failure.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = google_sheets4::Result<T>> + Send,
    ) -> Result<T, ServiceError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ServiceError::Api(e.to_string())),
            Err(_) => Err(ServiceError::Api(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<(), ServiceError> {
        let call = self.hub.spreadsheets().values_clear(
            ClearValuesRequest::default(),
            spreadsheet_id,
            range,
        );
        self.bounded(call.doit()).await.map(|_| ())
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<UpdateOutcome, ServiceError> {
        let body = ValueRange {
            values: Some(values),
            ..Default::default()
        };
        let call = self
            .hub
            .spreadsheets()
            .values_update(body, spreadsheet_id, range)
            .value_input_option("RAW");
        let (_, response) = self.bounded(call.doit()).await?;
        let updated_cells = response.updated_cells.unwrap_or(0).max(0) as u32;
        Ok(UpdateOutcome { updated_cells })
    }

    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetSummary, ServiceError> {
        let call = self.hub.spreadsheets().get(spreadsheet_id);
        let (_, spreadsheet) = self.bounded(call.doit()).await?;

        let title = spreadsheet
            .properties
            .and_then(|p| p.title)
            .unwrap_or_else(|| "Unknown".to_string());
        let sheets = spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .map(|sheet| {
                let props = sheet.properties.unwrap_or_default();
                SheetDescriptor {
                    sheet_id: props.sheet_id.unwrap_or(0),
                    title: props.title.unwrap_or_default(),
                    index: props.index.unwrap_or(0),
                    sheet_type: props.sheet_type.unwrap_or_else(|| "GRID".to_string()),
                }
            })
            .collect();

        Ok(SpreadsheetSummary { title, sheets })
    }
}
