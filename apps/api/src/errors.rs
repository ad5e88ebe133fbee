use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::capture::CaptureError;
use crate::ingest::IngestError;
use crate::models::InvalidResumeId;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Upload error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InvalidResumeId> for AppError {
    fn from(err: InvalidResumeId) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Render(RenderError::UnknownTemplate(e)) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_TEMPLATE", e.to_string())
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The resume could not be rendered".to_string(),
                )
            }
            AppError::Capture(CaptureError::InvalidGeometry(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Capture(CaptureError::EngineUnavailable(msg)) => {
                tracing::error!("Rendering engine unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ENGINE_UNAVAILABLE",
                    "The rendering engine is unavailable".to_string(),
                )
            }
            AppError::Capture(e @ CaptureError::RenderTimeout { .. }) => {
                tracing::warn!("{e}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "RENDER_TIMEOUT",
                    "Rendering the thumbnail took too long".to_string(),
                )
            }
            AppError::Capture(CaptureError::Persist(e)) | AppError::Ingest(IngestError::Persist(e)) => {
                tracing::error!("Persist error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSIST_ERROR",
                    "The thumbnail could not be saved".to_string(),
                )
            }
            AppError::Capture(e @ CaptureError::Engine { .. }) => {
                tracing::error!("{e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CAPTURE_ERROR",
                    "The thumbnail could not be captured".to_string(),
                )
            }
            AppError::Ingest(e @ IngestError::UnsupportedMediaType(_)) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                e.to_string(),
            ),
            AppError::Ingest(e @ IngestError::PayloadTooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", e.to_string())
            }
            AppError::Ingest(e @ IngestError::Read(_)) => {
                (StatusCode::BAD_REQUEST, "UPLOAD_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureState;
    use crate::storage::PersistError;
    use crate::templates::UnknownTemplateError;
    use std::time::Duration;

    fn status(err: impl Into<AppError>) -> StatusCode {
        err.into().parts().0
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status(RenderError::UnknownTemplate(UnknownTemplateError {
                name: "x".into()
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(InvalidResumeId), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(CaptureError::EngineUnavailable("gone".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(CaptureError::RenderTimeout {
                stage: CaptureState::PageLoading,
                after: Duration::from_secs(30)
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(CaptureError::Persist(PersistError {
                action: "write",
                path: "/x".into(),
                source: std::io::Error::other("disk full"),
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(IngestError::UnsupportedMediaType("text/plain".into())),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status(IngestError::PayloadTooLarge { limit: 10 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let (_, code, message) = AppError::from(CaptureError::Engine {
            stage: CaptureState::Capturing,
            message: "/tmp/resume-capture.x/chrome.log: segfault".into(),
        })
        .parts();
        assert_eq!(code, "CAPTURE_ERROR");
        assert!(!message.contains("/tmp"));
    }
}
