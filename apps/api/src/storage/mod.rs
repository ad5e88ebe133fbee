//! Artifact store. The two places thumbnails land on disk.
//!
//! Generated snapshots: `{root}/public/thumbnails/{id}.png`, served as `/thumbnails/{id}.png`.
//! Uploaded images:     `{root}/uploads/thumbnails/resume-{id}{ext}`, served under `/uploads/thumbnails`.
//!
//! Every write is staged in a temp file under a hidden sibling of the
//! destination directory (`.thumbnails-staging`, same filesystem, never served)
//! and renamed into place, so a reader sees the previous file or the new one,
//! never a partial write. The last publish for an id wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::{NamedTempFile, TempPath};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::models::ResumeId;

pub const SNAPSHOT_ROUTE: &str = "/thumbnails";
pub const UPLOAD_ROUTE: &str = "/uploads/thumbnails";

const STAGING_DIR: &str = ".thumbnails-staging";

#[derive(Debug, Error)]
#[error("failed to {action} {}: {source}", path.display())]
pub struct PersistError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl PersistError {
    fn new(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where an artifact was published.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactRef {
    /// Stable relative reference stored alongside the resume record.
    pub public_path: String,
    #[serde(skip)]
    pub file_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    snapshot_dir: PathBuf,
    snapshot_staging: PathBuf,
    upload_dir: PathBuf,
    upload_staging: PathBuf,
}

impl ArtifactStore {
    pub fn new(app_root: &Path) -> Self {
        let public = app_root.join("public");
        let uploads = app_root.join("uploads");
        Self {
            snapshot_dir: public.join("thumbnails"),
            snapshot_staging: public.join(STAGING_DIR),
            upload_dir: uploads.join("thumbnails"),
            upload_staging: uploads.join(STAGING_DIR),
        }
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Creates both directories if missing. Safe to call repeatedly.
    pub fn ensure_dirs(&self) -> Result<(), PersistError> {
        for dir in [
            &self.snapshot_dir,
            &self.snapshot_staging,
            &self.upload_dir,
            &self.upload_staging,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| PersistError::new("create", dir, e))?;
        }
        Ok(())
    }

    pub fn snapshot_ref(&self, id: &ResumeId) -> ArtifactRef {
        ArtifactRef {
            public_path: format!("{SNAPSHOT_ROUTE}/{id}.png"),
            file_path: self.snapshot_dir.join(format!("{id}.png")),
        }
    }

    /// `ext` includes the leading dot, e.g. `.jpg`.
    pub fn upload_ref(&self, id: &ResumeId, ext: &str) -> ArtifactRef {
        let file_name = format!("resume-{id}{ext}");
        ArtifactRef {
            public_path: format!("{UPLOAD_ROUTE}/{file_name}"),
            file_path: self.upload_dir.join(file_name),
        }
    }

    /// Atomically replaces the generated snapshot for `id` with `png`.
    pub async fn publish_snapshot(
        &self,
        id: &ResumeId,
        png: Vec<u8>,
    ) -> Result<ArtifactRef, PersistError> {
        let target = self.snapshot_ref(id);
        let staging = self.snapshot_staging.clone();
        let dest = target.file_path.clone();
        let len = png.len();

        tokio::task::spawn_blocking(move || write_atomic(&staging, &dest, &png))
            .await
            .map_err(|e| {
                PersistError::new("write", &target.file_path, std::io::Error::other(e))
            })??;

        info!("Published snapshot {} ({len} bytes)", target.public_path);
        Ok(target)
    }

    /// Opens a temp file in the upload staging directory. Nothing becomes
    /// visible until [`StagedArtifact::publish`]; dropping the stage deletes it.
    pub fn stage_upload(&self, id: &ResumeId, ext: &str) -> Result<StagedArtifact, PersistError> {
        for dir in [&self.upload_dir, &self.upload_staging] {
            std::fs::create_dir_all(dir).map_err(|e| PersistError::new("create", dir, e))?;
        }
        let temp = NamedTempFile::new_in(&self.upload_staging)
            .map_err(|e| PersistError::new("stage", &self.upload_staging, e))?;
        let (file, temp_path) = temp.into_parts();
        Ok(StagedArtifact {
            file: tokio::fs::File::from_std(file),
            temp_path,
            target: self.upload_ref(id, ext),
            written: 0,
        })
    }
}

fn write_atomic(staging: &Path, dest: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    if let Some(dir) = dest.parent() {
        std::fs::create_dir_all(dir).map_err(|e| PersistError::new("create", dir, e))?;
    }
    std::fs::create_dir_all(staging).map_err(|e| PersistError::new("create", staging, e))?;
    let mut temp =
        NamedTempFile::new_in(staging).map_err(|e| PersistError::new("stage", staging, e))?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| PersistError::new("write", temp.path(), e))?;
    temp.persist(dest)
        .map_err(|e| PersistError::new("publish", dest, e.error))?;
    debug!("renamed staged file into {}", dest.display());
    Ok(())
}

/// An upload being streamed to disk.
pub struct StagedArtifact {
    file: tokio::fs::File,
    temp_path: TempPath,
    target: ArtifactRef,
    written: u64,
}

impl StagedArtifact {
    pub fn written(&self) -> u64 {
        self.written
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| PersistError::new("write", &self.temp_path, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub async fn publish(mut self) -> Result<ArtifactRef, PersistError> {
        self.file
            .flush()
            .await
            .map_err(|e| PersistError::new("write", &self.temp_path, e))?;
        self.file
            .sync_all()
            .await
            .map_err(|e| PersistError::new("sync", &self.temp_path, e))?;
        drop(self.file);

        let dest = self.target.file_path.clone();
        self.temp_path
            .persist(&dest)
            .map_err(|e| PersistError::new("publish", &dest, e.error))?;
        info!(
            "Published upload {} ({} bytes)",
            self.target.public_path, self.written
        );
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ResumeId {
        ResumeId::parse(raw).unwrap()
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|rd| {
                rd.filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    #[test]
    fn test_layout_matches_public_routes() {
        let store = ArtifactStore::new(Path::new("/srv/app"));
        let snap = store.snapshot_ref(&id("42"));
        assert_eq!(snap.public_path, "/thumbnails/42.png");
        assert_eq!(snap.file_path, Path::new("/srv/app/public/thumbnails/42.png"));

        let upload = store.upload_ref(&id("7"), ".jpg");
        assert_eq!(upload.public_path, "/uploads/thumbnails/resume-7.jpg");
        assert_eq!(
            upload.file_path,
            Path::new("/srv/app/uploads/thumbnails/resume-7.jpg")
        );
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(root.path());
        store.ensure_dirs().unwrap();
        store.ensure_dirs().unwrap();
        assert!(store.snapshot_dir().is_dir());
        assert!(store.upload_dir().is_dir());
    }

    #[tokio::test]
    async fn test_publish_snapshot_creates_dir_and_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(root.path());

        let first = store.publish_snapshot(&id("42"), b"first".to_vec()).await.unwrap();
        assert_eq!(std::fs::read(&first.file_path).unwrap(), b"first");

        let second = store.publish_snapshot(&id("42"), b"second".to_vec()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second.file_path).unwrap(), b"second");
        assert_eq!(dir_entries(store.snapshot_dir()), vec!["42.png"]);
    }

    #[tokio::test]
    async fn test_publish_snapshot_reports_unwritable_dir() {
        let root = tempfile::tempdir().unwrap();
        // A file where the directory should be.
        std::fs::create_dir_all(root.path().join("public")).unwrap();
        std::fs::write(root.path().join("public").join("thumbnails"), b"x").unwrap();

        let store = ArtifactStore::new(root.path());
        let err = store.publish_snapshot(&id("1"), b"png".to_vec()).await.unwrap_err();
        assert_eq!(err.action, "create");
    }

    #[tokio::test]
    async fn test_staged_upload_is_invisible_until_published() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(root.path());

        let mut staged = store.stage_upload(&id("7"), ".png").unwrap();
        staged.write_chunk(b"abc").await.unwrap();
        staged.write_chunk(b"def").await.unwrap();
        assert_eq!(staged.written(), 6);
        // The partial file is outside the served directory.
        assert!(dir_entries(store.upload_dir()).is_empty());
        assert_eq!(dir_entries(&root.path().join("uploads/.thumbnails-staging")).len(), 1);

        let published = staged.publish().await.unwrap();
        assert_eq!(std::fs::read(&published.file_path).unwrap(), b"abcdef");
        assert_eq!(dir_entries(store.upload_dir()), vec!["resume-7.png"]);
    }

    #[tokio::test]
    async fn test_dropped_stage_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(root.path());

        let mut staged = store.stage_upload(&id("7"), ".png").unwrap();
        staged.write_chunk(b"partial").await.unwrap();
        drop(staged);

        assert!(dir_entries(store.upload_dir()).is_empty());
        assert!(dir_entries(&root.path().join("uploads/.thumbnails-staging")).is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_staging_is_emptied_after_publish() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(root.path());
        store.publish_snapshot(&id("42"), b"png".to_vec()).await.unwrap();

        assert_eq!(dir_entries(store.snapshot_dir()), vec!["42.png"]);
        assert!(dir_entries(&root.path().join("public/.thumbnails-staging")).is_empty());
    }
}
