use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use service::{
    runtime,
    storage::snapshot_store::{SnapshotStore, StoreOptions},
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(3000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Load the store section from configs, falling back to defaults plus the
/// STORE_PATH env var when no config file is present.
fn load_store_config() -> configs::StoreConfig {
    match configs::load_default() {
        Ok(cfg) => cfg.store,
        Err(_) => {
            let mut cfg = configs::StoreConfig::default();
            if let Ok(path) = env::var("STORE_PATH") {
                cfg.path = path;
            }
            cfg
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    runtime::ensure_env("public", "data").await?;

    // Snapshot store backing users, newsletter and recommendations
    let store_cfg = load_store_config();
    let opts = StoreOptions { default_on_corrupt: store_cfg.default_on_corrupt };
    let store = SnapshotStore::open(store_cfg.path, opts).await?;
    info!(path = %store.file_path().display(), "snapshot store ready");

    let state = AppState::new(store);

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting server crate");
    println!("starting server crate at {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
