use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root for `public/thumbnails` and `uploads/thumbnails`.
    pub app_root: PathBuf,
    /// Explicit Chrome/Chromium binary; searched in PATH when unset.
    pub chrome_bin: Option<PathBuf>,
    pub max_upload_bytes: u64,
    pub engine_launch_timeout: Duration,
    pub render_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            app_root: get("APP_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            chrome_bin: get("CHROME_BIN").map(PathBuf::from),
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            engine_launch_timeout: Duration::from_secs(parse_or(
                &get,
                "ENGINE_LAUNCH_TIMEOUT_SECS",
                10,
            )?),
            render_timeout: Duration::from_secs(parse_or(&get, "RENDER_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
