use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SCORING_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_SCORING_TIMEOUT_SECS: u64 = 120;
const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Gateway configuration loaded from environment variables.
/// Every value has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub scoring_service_url: String,
    pub scoring_timeout: Duration,
    pub upload_dir: PathBuf,
    /// `None` when the bound is disabled (`MAX_UPLOAD_BYTES=0`).
    pub max_upload_bytes: Option<usize>,
    pub extraction_timeout: Duration,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            scoring_service_url: DEFAULT_SCORING_SERVICE_URL.to_string(),
            scoring_timeout: Duration::from_secs(DEFAULT_SCORING_TIMEOUT_SECS),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
            extraction_timeout: Duration::from_secs(DEFAULT_EXTRACTION_TIMEOUT_SECS),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let max_upload_bytes: usize =
            parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            scoring_service_url: lookup("SCORING_SERVICE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.scoring_service_url),
            scoring_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SCORING_TIMEOUT_SECS",
                DEFAULT_SCORING_TIMEOUT_SECS,
            )?),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: (max_upload_bytes > 0).then_some(max_upload_bytes),
            extraction_timeout: Duration::from_secs(parse_or(
                &lookup,
                "EXTRACTION_TIMEOUT_SECS",
                DEFAULT_EXTRACTION_TIMEOUT_SECS,
            )?),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
