//! Headless Chromium backend.
//!
//! A session is a private profile directory plus the Chromium processes run
//! against it. Each step is one Chromium invocation:
//!
//! - load: write the page, `--dump-dom` under a virtual time budget, so the run
//!   only ends once the page has settled;
//! - viewport: same, on a copy with a measuring script, to learn the full
//!   document height at the requested width;
//! - capture: `--screenshot` with the window stretched to that height.
//!
//! Every process is spawned with `kill_on_drop`, DNS is mapped to nowhere, and
//! `terminate` kills whatever is still running and removes the profile.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use url::Url;

use super::engine::{EngineSession, RenderEngine};
use super::{CaptureError, CaptureGeometry, CaptureState};

const CANDIDATES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// How much virtual time Chromium gives the page to finish loading before it
/// dumps or screenshots. Documents are self-contained, so this is generous.
const VIRTUAL_TIME_BUDGET: Duration = Duration::from_millis(5_000);

const HEIGHT_ATTR: &str = "data-capture-height";

const MEASURE_SCRIPT: &str = "<script>window.addEventListener('load',function(){\
var d=document.documentElement,b=document.body;\
var h=Math.max(d.scrollHeight,b?b.scrollHeight:0);\
d.setAttribute('data-capture-height',String(Math.ceil(h)));});</script>";

#[derive(Debug, Clone)]
pub struct ChromiumEngine {
    configured: Option<PathBuf>,
}

impl ChromiumEngine {
    /// `configured` is an explicit binary (`CHROME_BIN`); without it the
    /// usual Chrome/Chromium names are looked up in `PATH` at launch.
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self { configured }
    }

    fn resolve_binary(&self) -> Result<PathBuf, CaptureError> {
        if let Some(path) = &self.configured {
            return resolve_program_path(path).ok_or_else(|| {
                CaptureError::EngineUnavailable(format!(
                    "configured browser not found: {}",
                    path.display()
                ))
            });
        }
        CANDIDATES
            .iter()
            .find_map(|name| find_in_path(name))
            .ok_or_else(|| {
                CaptureError::EngineUnavailable(format!(
                    "no Chrome/Chromium binary found in PATH (looked for {}); set CHROME_BIN",
                    CANDIDATES.join(", ")
                ))
            })
    }
}

fn resolve_program_path(program: &Path) -> Option<PathBuf> {
    let has_separator = program.components().count() > 1;
    if has_separator || program.is_absolute() {
        return program.is_file().then(|| program.to_path_buf());
    }
    find_in_path(program.to_str()?)
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn launch(&self) -> Result<Box<dyn EngineSession>, CaptureError> {
        let binary = self.resolve_binary()?;
        let version = probe_version(&binary).await?;

        let profile = tempfile::Builder::new()
            .prefix("resume-capture.")
            .tempdir()
            .map_err(|e| CaptureError::EngineUnavailable(format!("create profile dir: {e}")))?;

        info!(
            "Started {version} session in {}",
            profile.path().display()
        );
        Ok(Box::new(ChromiumSession {
            binary,
            profile: Some(profile),
            running: None,
            page_url: None,
            measure_url: None,
            window: None,
        }))
    }
}

async fn probe_version(binary: &Path) -> Result<String, CaptureError> {
    let output = Command::new(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            CaptureError::EngineUnavailable(format!("failed to run {}: {e}", binary.display()))
        })?;
    if !output.status.success() {
        return Err(CaptureError::EngineUnavailable(format!(
            "{} --version exited with {}",
            binary.display(),
            output.status
        )));
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        return Ok(binary.display().to_string());
    }
    Ok(version)
}

/// Width, full height and scale of the window the screenshot is taken in.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    width: u32,
    height: u32,
    scale: f32,
}

struct ChromiumSession {
    binary: PathBuf,
    profile: Option<TempDir>,
    running: Option<Child>,
    page_url: Option<String>,
    measure_url: Option<String>,
    window: Option<Window>,
}

impl ChromiumSession {
    fn profile_dir(&self, stage: CaptureState) -> Result<PathBuf, CaptureError> {
        self.profile
            .as_ref()
            .map(|p| p.path().to_path_buf())
            .ok_or_else(|| engine_error(stage, "session already terminated"))
    }

    /// Runs one Chromium process with stdout redirected to `stdout_name` in
    /// the profile directory and stderr appended to `chrome.log`.
    async fn run(
        &mut self,
        stage: CaptureState,
        args: Vec<String>,
        stdout_name: &str,
    ) -> Result<PathBuf, CaptureError> {
        let dir = self.profile_dir(stage)?;
        let out_path = dir.join(stdout_name);
        let log_path = dir.join("chrome.log");

        let stdout = std::fs::File::create(&out_path)
            .map_err(|e| engine_error(stage, format!("create {}: {e}", out_path.display())))?;
        let stderr = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| engine_error(stage, format!("open {}: {e}", log_path.display())))?;

        debug!("chrome ({stage}): {}", args.join(" "));
        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| engine_error(stage, format!("spawn {}: {e}", self.binary.display())))?;

        let child = self.running.insert(child);
        let status = child.wait().await;
        self.running = None;

        match status {
            Ok(status) if status.success() => Ok(out_path),
            Ok(status) => Err(engine_error(
                stage,
                format!("chrome exited with {status}: {}", log_tail(&log_path)),
            )),
            Err(e) => Err(engine_error(stage, format!("wait for chrome: {e}"))),
        }
    }
}

#[async_trait]
impl EngineSession for ChromiumSession {
    async fn load(&mut self, markup: &str) -> Result<(), CaptureError> {
        let stage = CaptureState::PageLoading;
        let dir = self.profile_dir(stage)?;
        let page = dir.join("page.html");
        let measure = dir.join("measure.html");

        tokio::fs::write(&page, markup)
            .await
            .map_err(|e| engine_error(stage, format!("write page: {e}")))?;
        tokio::fs::write(&measure, inject_measure_script(markup))
            .await
            .map_err(|e| engine_error(stage, format!("write page: {e}")))?;

        let page_url = file_url(&page).map_err(|msg| engine_error(stage, msg))?;
        let mut args = base_args(&dir);
        args.push("--dump-dom".to_string());
        args.push(page_url.clone());

        let dumped = self.run(stage, args, "settled.html").await?;
        let len = tokio::fs::metadata(&dumped).await.map(|m| m.len()).unwrap_or(0);
        if len == 0 {
            return Err(engine_error(stage, "page produced an empty document"));
        }

        self.page_url = Some(page_url);
        self.measure_url = Some(file_url(&measure).map_err(|msg| engine_error(stage, msg))?);
        Ok(())
    }

    async fn set_viewport(&mut self, geometry: &CaptureGeometry) -> Result<(), CaptureError> {
        let stage = CaptureState::ViewportSet;
        let dir = self.profile_dir(stage)?;
        let measure_url = self
            .measure_url
            .clone()
            .ok_or_else(|| engine_error(stage, "no page loaded"))?;

        let mut args = base_args(&dir);
        args.extend(window_args(geometry.width, geometry.height, geometry.scale));
        args.push("--dump-dom".to_string());
        args.push(measure_url);

        let dumped = self.run(stage, args, "measured.html").await?;
        let dom = tokio::fs::read_to_string(&dumped)
            .await
            .map_err(|e| engine_error(stage, format!("read measurement: {e}")))?;

        let height = match parse_measured_height(&dom) {
            Some(measured) => measured.max(geometry.height).min(CaptureGeometry::MAX_SIDE),
            None => {
                warn!("could not measure document height; capturing the viewport only");
                geometry.height
            }
        };
        let (raster_w, raster_h) = geometry.raster_size(height);
        debug!(
            "capture window {}x{height} css, {raster_w}x{raster_h} raster",
            geometry.width
        );
        self.window = Some(Window {
            width: geometry.width,
            height,
            scale: geometry.scale,
        });
        Ok(())
    }

    async fn capture_full_page(&mut self) -> Result<Vec<u8>, CaptureError> {
        let stage = CaptureState::Capturing;
        let dir = self.profile_dir(stage)?;
        let (Some(page_url), Some(window)) = (self.page_url.clone(), self.window) else {
            return Err(engine_error(stage, "viewport not set"));
        };
        let shot = dir.join("screenshot.png");

        let mut args = base_args(&dir);
        args.extend(window_args(window.width, window.height, window.scale));
        args.push(format!("--screenshot={}", shot.display()));
        args.push(page_url);

        self.run(stage, args, "screenshot.out").await?;
        let png = tokio::fs::read(&shot)
            .await
            .map_err(|e| engine_error(stage, format!("chrome did not produce a screenshot: {e}")))?;
        if png.is_empty() {
            return Err(engine_error(stage, "chrome produced an empty screenshot"));
        }
        Ok(png)
    }

    fn terminate(&mut self) {
        if let Some(mut child) = self.running.take() {
            if let Err(e) = child.start_kill() {
                warn!("failed to kill chrome: {e}");
            }
        }
        if let Some(profile) = self.profile.take() {
            let path = profile.path().display().to_string();
            match profile.close() {
                Ok(()) => debug!("removed chrome profile {path}"),
                Err(e) => warn!("failed to remove chrome profile {path}: {e}"),
            }
        }
    }
}

fn engine_error(stage: CaptureState, message: impl Into<String>) -> CaptureError {
    CaptureError::Engine {
        stage,
        message: message.into(),
    }
}

fn base_args(profile_dir: &Path) -> Vec<String> {
    vec![
        "--headless=new".to_string(),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--hide-scrollbars".to_string(),
        // Offline: nothing in a rendered document should reach the network.
        "--disable-background-networking".to_string(),
        "--dns-prefetch-disable".to_string(),
        "--host-resolver-rules=MAP * ~NOTFOUND".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-component-update".to_string(),
        "--disable-default-apps".to_string(),
        "--disable-sync".to_string(),
        "--run-all-compositor-stages-before-draw".to_string(),
        format!("--virtual-time-budget={}", VIRTUAL_TIME_BUDGET.as_millis()),
        format!("--user-data-dir={}", profile_dir.display()),
    ]
}

fn window_args(width: u32, height: u32, scale: f32) -> [String; 2] {
    [
        format!("--window-size={width},{height}"),
        format!("--force-device-scale-factor={scale}"),
    ]
}

fn file_url(path: &Path) -> Result<String, String> {
    Url::from_file_path(path)
        .map(|u| u.to_string())
        .map_err(|_| format!("could not convert {} to a file:// URL", path.display()))
}

/// Inserts the measuring script before `</body>`, or appends it.
fn inject_measure_script(markup: &str) -> String {
    let lower = markup.to_ascii_lowercase();
    match lower.rfind("</body>") {
        Some(at) => {
            let mut out = String::with_capacity(markup.len() + MEASURE_SCRIPT.len());
            out.push_str(&markup[..at]);
            out.push_str(MEASURE_SCRIPT);
            out.push_str(&markup[at..]);
            out
        }
        None => format!("{markup}{MEASURE_SCRIPT}"),
    }
}

fn parse_measured_height(dom: &str) -> Option<u32> {
    let marker = format!("{HEIGHT_ATTR}=\"");
    let start = dom.find(&marker)? + marker.len();
    let digits: String = dom[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|h| *h > 0)
}

fn log_tail(path: &Path) -> String {
    const TAIL: usize = 400;
    let log = std::fs::read_to_string(path).unwrap_or_default();
    let trimmed = log.trim();
    if trimmed.is_empty() {
        return "no output".to_string();
    }
    let start = trimmed
        .char_indices()
        .rev()
        .nth(TAIL)
        .map(|(i, _)| i)
        .unwrap_or(0);
    trimmed[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_args_use_css_size_and_scale() {
        let g = CaptureGeometry::A4;
        assert_eq!(
            window_args(g.width, g.height, g.scale),
            [
                "--window-size=794,1123".to_string(),
                "--force-device-scale-factor=2".to_string()
            ]
        );
    }

    #[test]
    fn test_base_args_are_offline_and_isolated() {
        let args = base_args(Path::new("/tmp/profile-x"));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile-x".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--host-resolver-rules=")));
        assert!(args.iter().any(|a| a.starts_with("--virtual-time-budget=")));
    }

    #[test]
    fn test_inject_before_body_close() {
        let out = inject_measure_script("<html><body><p>x</p></BODY></html>");
        assert!(out.starts_with("<html><body><p>x</p><script>"));
        assert!(out.ends_with("</script></BODY></html>"));
    }

    #[test]
    fn test_inject_appends_without_body() {
        let out = inject_measure_script("<p>x</p>");
        assert!(out.starts_with("<p>x</p><script>"));
    }

    #[test]
    fn test_parse_measured_height() {
        let dom = r#"<html lang="en" data-capture-height="1480"><head></head></html>"#;
        assert_eq!(parse_measured_height(dom), Some(1480));
        assert_eq!(parse_measured_height("<html></html>"), None);
        assert_eq!(
            parse_measured_height(r#"<html data-capture-height="0">"#),
            None
        );
    }

    #[test]
    fn test_file_url() {
        assert_eq!(
            file_url(Path::new("/tmp/a b/page.html")).unwrap(),
            "file:///tmp/a%20b/page.html"
        );
        assert!(file_url(Path::new("relative.html")).is_err());
    }

    #[tokio::test]
    async fn test_missing_configured_binary_is_unavailable() {
        let engine = ChromiumEngine::new(Some(PathBuf::from("/nonexistent/bin/chrome")));
        let err = engine.launch().await.err().expect("launch must fail");
        assert!(matches!(err, CaptureError::EngineUnavailable(_)));
    }

    #[tokio::test]
    async fn test_failing_binary_is_unavailable() {
        // `false` exists everywhere and exits non-zero for `--version`.
        let Some(binary) = find_in_path("false") else {
            return;
        };
        let engine = ChromiumEngine::new(Some(binary));
        let err = engine.launch().await.err().expect("launch must fail");
        assert!(matches!(err, CaptureError::EngineUnavailable(_)));
    }
}
