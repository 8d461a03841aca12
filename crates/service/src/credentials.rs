use std::fmt;

use crate::errors::ServiceError;

/// Raw service-account key material, resolved once by the hosting process and
/// injected into the connector. Parsing into an actual key happens per
/// request when the client is built.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    json: String,
}

impl ServiceAccountCredentials {
    pub fn from_json(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }

    /// Read the JSON key blob from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, ServiceError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self { json: value }),
            _ => Err(ServiceError::Configuration(format!(
                "environment variable {var} is not set"
            ))),
        }
    }

    pub fn json(&self) -> &str {
        &self.json
    }
}

// Key material must not leak into logs.
impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("json", &"<redacted>")
            .finish()
    }
}
