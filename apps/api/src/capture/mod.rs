//! Snapshot capture. Turns a rendered document into `public/thumbnails/{id}.png`.
//!
//! Each capture owns one engine instance from launch to release:
//!
//! ```text
//! Idle → EngineLaunching → PageLoading → ViewportSet → Capturing → Persisting → Closed
//!                 └──────────────┴─────────────┴────────────┴───────────┴──→ ErrorClosed
//! ```
//!
//! The instance is held by a `SessionGuard`, so it is terminated exactly once on
//! every exit path, including when the caller drops the future mid-capture.
//! Nothing is retried here; callers decide.

pub mod chromium;
pub mod engine;
pub mod handlers;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::ResumeId;
use crate::storage::{ArtifactRef, ArtifactStore, PersistError};
use engine::{RenderEngine, SessionGuard};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Output geometry in CSS pixels plus device scale factor. The default is the
/// A4-proportioned 794×1123 at 2x, i.e. a 1588×2246 raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureGeometry {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl CaptureGeometry {
    pub const A4: CaptureGeometry = CaptureGeometry {
        width: 794,
        height: 1123,
        scale: 2.0,
    };

    const MAX_SIDE: u32 = 16_384;
    const MAX_SCALE: f32 = 8.0;
    /// Ceiling on physical pixels of the requested viewport, about 64 MP.
    const MAX_RASTER_PIXELS: u64 = 8192 * 8192;

    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::InvalidGeometry(
                "width and height must be positive".to_string(),
            ));
        }
        if self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE {
            return Err(CaptureError::InvalidGeometry(format!(
                "width and height must not exceed {}",
                Self::MAX_SIDE
            )));
        }
        if !(self.scale > 0.0 && self.scale <= Self::MAX_SCALE) {
            return Err(CaptureError::InvalidGeometry(format!(
                "scale must be in (0, {}]",
                Self::MAX_SCALE
            )));
        }
        let (raster_w, raster_h) = self.raster_size(self.height);
        if u64::from(raster_w) * u64::from(raster_h) > Self::MAX_RASTER_PIXELS {
            return Err(CaptureError::InvalidGeometry(format!(
                "{raster_w}x{raster_h} raster exceeds {} pixels",
                Self::MAX_RASTER_PIXELS
            )));
        }
        Ok(())
    }

    /// Physical raster size for a page of `css_height` CSS pixels.
    pub fn raster_size(&self, css_height: u32) -> (u32, u32) {
        (
            (self.width as f32 * self.scale).round() as u32,
            (css_height as f32 * self.scale).round() as u32,
        )
    }
}

impl Default for CaptureGeometry {
    fn default() -> Self {
        Self::A4
    }
}

// ────────────────────────────────────────────────────────────────────────────
// States and errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    EngineLaunching,
    PageLoading,
    ViewportSet,
    Capturing,
    Persisting,
    Closed,
    ErrorClosed,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaptureState::Idle => "idle",
            CaptureState::EngineLaunching => "launching engine",
            CaptureState::PageLoading => "loading page",
            CaptureState::ViewportSet => "setting viewport",
            CaptureState::Capturing => "capturing",
            CaptureState::Persisting => "persisting",
            CaptureState::Closed => "closed",
            CaptureState::ErrorClosed => "closed after error",
        })
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("timed out after {}s while {stage}", after.as_secs())]
    RenderTimeout { stage: CaptureState, after: Duration },

    #[error("rendering engine failed while {stage}: {message}")]
    Engine { stage: CaptureState, message: String },

    #[error("invalid capture geometry: {0}")]
    InvalidGeometry(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Logs transitions for one capture and remembers where it stopped.
struct Lifecycle<'a> {
    resume_id: &'a ResumeId,
    state: CaptureState,
}

impl<'a> Lifecycle<'a> {
    fn new(resume_id: &'a ResumeId) -> Self {
        Self {
            resume_id,
            state: CaptureState::Idle,
        }
    }

    fn advance(&mut self, next: CaptureState) {
        debug!("capture {}: {} -> {}", self.resume_id, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: CaptureError) -> CaptureError {
        warn!("capture {} failed while {}: {err}", self.resume_id, self.state);
        self.state = CaptureState::ErrorClosed;
        err
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capture engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct CaptureTimeouts {
    pub launch: Duration,
    /// Bound on each of load, viewport and capture.
    pub step: Duration,
}

#[derive(Clone)]
pub struct CaptureEngine {
    engine: Arc<dyn RenderEngine>,
    store: ArtifactStore,
    timeouts: CaptureTimeouts,
}

impl CaptureEngine {
    pub fn new(engine: Arc<dyn RenderEngine>, store: ArtifactStore, timeouts: CaptureTimeouts) -> Self {
        Self {
            engine,
            store,
            timeouts,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.engine.name()
    }

    /// Renders `markup` to a PNG and publishes it as the snapshot for `resume_id`.
    pub async fn capture(
        &self,
        markup: &str,
        resume_id: &ResumeId,
        geometry: &CaptureGeometry,
    ) -> Result<ArtifactRef, CaptureError> {
        geometry.validate()?;
        let mut lifecycle = Lifecycle::new(resume_id);

        lifecycle.advance(CaptureState::EngineLaunching);
        let session = match tokio::time::timeout(self.timeouts.launch, self.engine.launch()).await {
            Ok(Ok(session)) => session,
            Ok(Err(err)) => return Err(lifecycle.fail(err)),
            Err(_) => {
                return Err(lifecycle.fail(CaptureError::EngineUnavailable(format!(
                    "{} did not start within {}s",
                    self.engine.name(),
                    self.timeouts.launch.as_secs()
                ))))
            }
        };
        let mut guard = SessionGuard::new(session);

        let png = match self.drive(&mut guard, &mut lifecycle, markup, geometry).await {
            Ok(png) => png,
            Err(err) => return Err(lifecycle.fail(err)),
        };

        lifecycle.advance(CaptureState::Persisting);
        let artifact = match self.store.publish_snapshot(resume_id, png).await {
            Ok(artifact) => artifact,
            Err(err) => return Err(lifecycle.fail(err.into())),
        };

        guard.release();
        lifecycle.advance(CaptureState::Closed);
        info!(
            "Captured thumbnail for resume {resume_id} via {}",
            self.engine.name()
        );
        Ok(artifact)
    }

    async fn drive(
        &self,
        guard: &mut SessionGuard,
        lifecycle: &mut Lifecycle<'_>,
        markup: &str,
        geometry: &CaptureGeometry,
    ) -> Result<Vec<u8>, CaptureError> {
        let step = self.timeouts.step;

        lifecycle.advance(CaptureState::PageLoading);
        bounded(step, CaptureState::PageLoading, guard.session().load(markup)).await?;

        lifecycle.advance(CaptureState::ViewportSet);
        bounded(
            step,
            CaptureState::ViewportSet,
            guard.session().set_viewport(geometry),
        )
        .await?;

        lifecycle.advance(CaptureState::Capturing);
        let png = bounded(step, CaptureState::Capturing, guard.session().capture_full_page()).await?;

        if !png.starts_with(PNG_SIGNATURE) {
            return Err(CaptureError::Engine {
                stage: CaptureState::Capturing,
                message: format!("engine returned {} bytes that are not a PNG", png.len()),
            });
        }
        Ok(png)
    }
}

async fn bounded<T, F>(limit: Duration, stage: CaptureState, step: F) -> Result<T, CaptureError>
where
    F: std::future::Future<Output = Result<T, CaptureError>>,
{
    match tokio::time::timeout(limit, step).await {
        Ok(result) => result,
        Err(_) => Err(CaptureError::RenderTimeout {
            stage,
            after: limit,
        }),
    }
}
