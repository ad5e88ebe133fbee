//! Route handler for generating a thumbnail from resume data.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureGeometry;
use crate::errors::AppError;
use crate::models::resume::null_as_default;
use crate::models::{ResumeData, ResumeId};
use crate::render::render_named;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateThumbnailRequest {
    pub template: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ResumeData,
    #[serde(default)]
    pub geometry: Option<CaptureGeometry>,
}

#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    /// Relative path the data layer stores against the resume.
    pub thumbnail: String,
}

/// POST /api/v1/resumes/:resume_id/thumbnail/generate
///
/// Renders the resume with the chosen template and captures it as
/// `public/thumbnails/{id}.png`.
pub async fn handle_generate_thumbnail(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
    Json(request): Json<GenerateThumbnailRequest>,
) -> Result<Json<ThumbnailResponse>, AppError> {
    let resume_id = ResumeId::parse(&resume_id)?;
    let document = render_named(&request.template, &request.data)?;
    let geometry = request.geometry.unwrap_or_default();

    let artifact = state
        .capture
        .capture(document.as_str(), &resume_id, &geometry)
        .await?;

    Ok(Json(ThumbnailResponse {
        thumbnail: artifact.public_path,
    }))
}
