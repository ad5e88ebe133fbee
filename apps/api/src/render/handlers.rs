//! Route handlers for template listing and document preview.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::null_as_default;
use crate::models::ResumeData;
use crate::render::render_named;
use crate::templates;

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub template: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ResumeData,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(
        templates::all()
            .map(|t| TemplateInfo {
                id: t.variant.id(),
                name: t.display_name,
            })
            .collect(),
    )
}

/// POST /api/v1/render
///
/// Returns the rendered HTML document, exactly what the capture engine sees.
pub async fn handle_render(Json(request): Json<RenderRequest>) -> Result<Response, AppError> {
    let document = render_named(&request.template, &request.data)?;
    debug!("Rendered {} document ({} bytes)", document.variant(), document.as_str().len());
    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        document.into_string(),
    )
        .into_response())
}
