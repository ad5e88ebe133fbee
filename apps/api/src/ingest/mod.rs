//! Thumbnail ingestion. Accepts a user-supplied image as the resume thumbnail
//! instead of a generated snapshot.
//!
//! The only content gate is the declared MIME type (`image/*`); bytes are not
//! sniffed. The body is streamed to a staged temp file and the size ceiling is
//! enforced chunk by chunk, so an oversized upload is cut off without ever
//! being held in memory.

pub mod handlers;

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::ResumeId;
use crate::storage::{ArtifactRef, ArtifactStore, PersistError};

const IMAGE_PREFIX: &str = "image/";
const DEFAULT_EXTENSION: &str = ".png";
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported media type '{0}': only image uploads are accepted")]
    UnsupportedMediaType(String),

    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("failed to read upload: {0}")]
    Read(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A body delivered in chunks, e.g. one multipart field.
#[async_trait]
pub trait ChunkSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, IngestError>;
}

/// Metadata the client declared for the upload.
#[derive(Debug, Clone, Default)]
pub struct UploadMeta {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IngestGateway {
    store: ArtifactStore,
    max_bytes: u64,
}

impl IngestGateway {
    pub fn new(store: ArtifactStore, max_bytes: u64) -> Self {
        Self { store, max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Streams `body` into `uploads/thumbnails/resume-{id}{ext}`, replacing any
    /// previous upload with the same name.
    pub async fn accept<S: ChunkSource>(
        &self,
        resume_id: &ResumeId,
        meta: &UploadMeta,
        body: &mut S,
    ) -> Result<ArtifactRef, IngestError> {
        let declared = meta.content_type.as_deref().unwrap_or("");
        if !is_image(declared) {
            warn!("Rejected thumbnail upload for resume {resume_id}: type '{declared}'");
            return Err(IngestError::UnsupportedMediaType(declared.to_string()));
        }

        let ext = extension_for(meta.file_name.as_deref());
        let mut staged = self.store.stage_upload(resume_id, &ext)?;

        while let Some(chunk) = body.next_chunk().await? {
            if staged.written() + chunk.len() as u64 > self.max_bytes {
                warn!(
                    "Rejected thumbnail upload for resume {resume_id}: over {} bytes",
                    self.max_bytes
                );
                return Err(IngestError::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }
            staged.write_chunk(&chunk).await?;
        }

        let artifact = staged.publish().await?;
        info!("Accepted thumbnail upload for resume {resume_id} ({declared})");
        Ok(artifact)
    }
}

fn is_image(content_type: &str) -> bool {
    content_type
        .get(..IMAGE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_PREFIX))
}

/// `.ext` from the original file name, or `.png` when there is none usable.
fn extension_for(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
