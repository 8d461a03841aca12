use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::errors::ServiceError;
use tracing::error;

/// HTTP rendering of a failed operation: `error` plus optional `details`,
/// and `success:false` on server-side failures.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg, None),
            ServiceError::Configuration(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "service-account credentials are missing or malformed",
                Some(detail),
            ),
            ServiceError::Api(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Google Sheets API error: {detail}"),
                Some(detail),
            ),
            ServiceError::Unexpected(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "an unexpected error occurred",
                Some(detail),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        }
        let mut body = json!({ "error": self.message });
        if let Some(details) = self.details {
            body["details"] = json!(details);
        }
        if self.status.is_server_error() {
            body["success"] = json!(false);
        }
        (self.status, Json(body)).into_response()
    }
}
