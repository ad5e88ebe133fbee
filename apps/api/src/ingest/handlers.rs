//! Multipart upload endpoint for user-supplied thumbnails.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use async_trait::async_trait;
use bytes::Bytes;

use crate::capture::handlers::ThumbnailResponse;
use crate::errors::AppError;
use crate::ingest::{ChunkSource, IngestError, UploadMeta};
use crate::models::ResumeId;
use crate::state::AppState;

/// Name of the multipart field carrying the image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

#[async_trait]
impl<'a> ChunkSource for Field<'a> {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, IngestError> {
        self.chunk().await.map_err(|e| read_error(e, None))
    }
}

/// Body-limit rejections surface from the multipart stream as 413s.
fn read_error(err: MultipartError, limit: Option<u64>) -> IngestError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return IngestError::PayloadTooLarge {
            limit: limit.unwrap_or_default(),
        };
    }
    IngestError::Read(err.body_text())
}

/// POST /api/v1/resumes/:resume_id/thumbnail
///
/// Stores the `thumbnail` field as `uploads/thumbnails/resume-{id}{ext}` and
/// returns its public path.
pub async fn handle_upload_thumbnail(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ThumbnailResponse>, AppError> {
    let resume_id = ResumeId::parse(&resume_id)?;
    let limit = Some(state.ingest.max_bytes());

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, limit))?
    {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }
        let meta = UploadMeta {
            content_type: field.content_type().map(str::to_string),
            file_name: field.file_name().map(str::to_string),
        };
        let artifact = state
            .ingest
            .accept(&resume_id, &meta, &mut field)
            .await
            .map_err(|e| match e {
                IngestError::PayloadTooLarge { .. } => IngestError::PayloadTooLarge {
                    limit: state.ingest.max_bytes(),
                },
                other => other,
            })?;
        return Ok(Json(ThumbnailResponse {
            thumbnail: artifact.public_path,
        }));
    }

    Err(AppError::Validation(format!(
        "multipart field '{THUMBNAIL_FIELD}' is required"
    )))
}
