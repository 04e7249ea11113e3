//! Runtime settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Default store root, relative to the working directory.
const DEFAULT_STORE: &str = ".sitescope";
/// Default number of concurrent requests per fetch batch.
const DEFAULT_FETCH_BATCH: usize = 5;
/// Default per-request timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings shared by the command handlers and live adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root directory of the project store (`SITESCOPE_STORE`).
    pub store_root: PathBuf,
    /// Directory to record cassettes into, when recording (`SITESCOPE_RECORD`).
    pub record_dir: Option<PathBuf>,
    /// Requests per fetch batch (`SITESCOPE_FETCH_BATCH`), never zero.
    pub fetch_batch: usize,
    /// Per-request timeout of the live HTTP adapter (`SITESCOPE_HTTP_TIMEOUT_SECS`).
    pub http_timeout: Duration,
    /// User-Agent header sent by the live HTTP adapter (`SITESCOPE_USER_AGENT`).
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// A `.env` file in the working directory is applied first when present;
    /// variables already set in the environment take precedence over it.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_root = lookup("SITESCOPE_STORE")
            .map_or_else(|| PathBuf::from(DEFAULT_STORE), PathBuf::from);
        let record_dir = lookup("SITESCOPE_RECORD")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let fetch_batch = lookup("SITESCOPE_FETCH_BATCH")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_FETCH_BATCH)
            .max(1);
        let timeout_secs = lookup("SITESCOPE_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        let user_agent = lookup("SITESCOPE_USER_AGENT")
            .unwrap_or_else(|| format!("sitescope/{}", env!("CARGO_PKG_VERSION")));

        Self {
            store_root,
            record_dir,
            fetch_batch,
            http_timeout: Duration::from_secs(timeout_secs),
            user_agent,
        }
    }
}
