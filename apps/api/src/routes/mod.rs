pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::capture::handlers::handle_generate_thumbnail;
use crate::completion::handlers::handle_completion;
use crate::ingest::handlers::handle_upload_thumbnail;
use crate::render::handlers::{handle_list_templates, handle_render};
use crate::state::AppState;
use crate::storage::{SNAPSHOT_ROUTE, UPLOAD_ROUTE};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_HEADROOM: u64 = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit =
        usize::try_from(state.config.max_upload_bytes.saturating_add(MULTIPART_HEADROOM))
            .unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(handle_list_templates))
        .route("/api/v1/render", post(handle_render))
        .route("/api/v1/completion", post(handle_completion))
        .route(
            "/api/v1/resumes/:resume_id/thumbnail/generate",
            post(handle_generate_thumbnail),
        )
        .route(
            "/api/v1/resumes/:resume_id/thumbnail",
            post(handle_upload_thumbnail).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest_service(SNAPSHOT_ROUTE, ServeDir::new(state.store.snapshot_dir()))
        .nest_service(UPLOAD_ROUTE, ServeDir::new(state.store.upload_dir()))
        .with_state(state)
}
