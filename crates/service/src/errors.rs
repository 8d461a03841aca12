use thiserror::Error;

/// Failure taxonomy for the sheets operations. `Validation` maps to a client
/// error at the HTTP boundary, everything else to a server error.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("Google Sheets API error: {0}")]
    Api(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn required(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}
