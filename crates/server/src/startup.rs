use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::credentials::ServiceAccountCredentials;
use service::google::GoogleSheetsConnector;
use service::sheets::SheetsService;

use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from config.toml, falling back to env vars.
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
            {
                cfg.server.port = port;
            }
            cfg
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();

    // Credentials are resolved once here and injected; the connector still
    // builds a fresh authenticated client per request.
    let credentials = ServiceAccountCredentials::from_env(&cfg.sheets.credentials_env)?;
    let connector = GoogleSheetsConnector::new(
        credentials,
        Duration::from_secs(cfg.sheets.request_timeout_secs),
    );
    let state = ServerState {
        sheets: SheetsService::new(Arc::new(connector)),
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting sheets bridge server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
