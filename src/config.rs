use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default results site queried by `search`.
pub const DEFAULT_BASE_URL: &str = "https://www.gematrix.org";

/// Default directory for per-page CSV/JSON exports.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Default upper bound on a single page fetch.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Central configuration loaded from environment variables.
///
/// Nothing here is secret. The .env file is loaded automatically at
/// startup via dotenvy, so local overrides can live there.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the results site (GEMPRINT_BASE_URL)
    pub base_url: String,
    /// Where page exports are written; created on demand (GEMPRINT_OUTPUT_DIR)
    pub output_dir: PathBuf,
    /// Fetch timeout. Expiry is treated like any other transport failure.
    pub fetch_timeout: Duration,
    /// Optional User-Agent override (GEMPRINT_USER_AGENT)
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every field has a default; only a malformed timeout is an error.
    pub fn load() -> Result<Self> {
        let timeout_secs = match env::var("GEMPRINT_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: env::var("GEMPRINT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            output_dir: env::var("GEMPRINT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            fetch_timeout: Duration::from_secs(timeout_secs),
            user_agent: env::var("GEMPRINT_USER_AGENT")
                .ok()
                .filter(|ua| !ua.trim().is_empty()),
        })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("GEMPRINT_TIMEOUT_SECS is not a whole number: {raw:?}"))?;
    if secs == 0 {
        anyhow::bail!("GEMPRINT_TIMEOUT_SECS must be greater than zero");
    }
    Ok(secs)
}
