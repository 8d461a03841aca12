use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
        }
    }
}

/// Settings for the outbound Google Sheets client.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Name of the environment variable holding the JSON service-account key.
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,
    /// Outbound call timeout; upstream calls exceeding it fail the request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_env: default_credentials_env(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_credentials_env() -> String {
    "GOOGLE_APPLICATION_CREDENTIALS_JSON".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.sheets.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".into();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be non-zero"));
        }
        Ok(())
    }
}

impl SheetsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.credentials_env.trim().is_empty() {
            return Err(anyhow!("sheets.credentials_env must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("sheets.request_timeout_secs must be non-zero"));
        }
        Ok(())
    }
}
