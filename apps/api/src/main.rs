mod capture;
mod completion;
mod config;
mod errors;
mod ingest;
mod models;
mod render;
mod routes;
mod state;
mod storage;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::capture::chromium::ChromiumEngine;
use crate::capture::{CaptureEngine, CaptureTimeouts};
use crate::config::Config;
use crate::ingest::IngestGateway;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ArtifactStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio API v{}", env!("CARGO_PKG_VERSION"));

    // Artifact directories live under APP_ROOT
    let store = ArtifactStore::new(&config.app_root);
    store.ensure_dirs()?;
    info!(
        snapshots = %store.snapshot_dir().display(),
        uploads = %store.upload_dir().display(),
        "Artifact store ready"
    );

    // Headless Chromium is resolved lazily per capture; a missing binary only
    // fails thumbnail generation, never startup.
    let engine = Arc::new(ChromiumEngine::new(config.chrome_bin.clone()));
    let capture = Arc::new(CaptureEngine::new(
        engine,
        store.clone(),
        CaptureTimeouts {
            launch: config.engine_launch_timeout,
            step: config.render_timeout,
        },
    ));
    let ingest = Arc::new(IngestGateway::new(store.clone(), config.max_upload_bytes));

    let state = AppState {
        config: config.clone(),
        store,
        capture,
        ingest,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
