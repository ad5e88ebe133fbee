use std::sync::Arc;

use crate::capture::CaptureEngine;
use crate::config::Config;
use crate::ingest::IngestGateway;
use crate::storage::ArtifactStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: ArtifactStore,
    pub capture: Arc<CaptureEngine>,
    pub ingest: Arc<IngestGateway>,
}
