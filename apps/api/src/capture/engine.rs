//! The seam between the capture pipeline and whatever turns markup into pixels.
//!
//! `CaptureEngine` holds an `Arc<dyn RenderEngine>`; the default backend is
//! headless Chromium, tests plug in fakes that record lifecycle calls.

use async_trait::async_trait;

use super::{CaptureError, CaptureGeometry};

#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Starts a fresh, isolated engine instance owned by a single capture.
    /// Failures map to `CaptureError::EngineUnavailable`.
    async fn launch(&self) -> Result<Box<dyn EngineSession>, CaptureError>;
}

/// One engine instance. Calls arrive in order: `load`, `set_viewport`,
/// `capture_full_page`, and `terminate` exactly once at the end, whatever
/// happened before.
#[async_trait]
pub trait EngineSession: Send {
    /// Loads the markup and returns once the page has settled.
    async fn load(&mut self, markup: &str) -> Result<(), CaptureError>;

    async fn set_viewport(&mut self, geometry: &CaptureGeometry) -> Result<(), CaptureError>;

    /// PNG bytes covering the whole document, not only the viewport.
    async fn capture_full_page(&mut self) -> Result<Vec<u8>, CaptureError>;

    /// Kills the engine process and frees its resources. Must not block for
    /// long and must tolerate being called after a failed step.
    fn terminate(&mut self);
}

/// Owns a session for the length of one capture and terminates it on drop,
/// which also covers cancellation of the owning future.
pub struct SessionGuard {
    session: Box<dyn EngineSession>,
    released: bool,
}

impl SessionGuard {
    pub fn new(session: Box<dyn EngineSession>) -> Self {
        Self {
            session,
            released: false,
        }
    }

    pub fn session(&mut self) -> &mut dyn EngineSession {
        self.session.as_mut()
    }

    /// Terminates now instead of waiting for drop. Idempotent.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.session.terminate();
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
