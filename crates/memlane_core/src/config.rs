//! Client configuration resolved from the environment.
//!
//! | Variable                    | Default                    |
//! |-----------------------------|----------------------------|
//! | `MEMLANE_API_URL`           | `http://localhost:8000`    |
//! | `MEMLANE_STORE_URL`         | unset (no hosted store)    |
//! | `MEMLANE_DB_PATH`           | `<tmp>/memlane_local.sqlite3` |
//! | `MEMLANE_HTTP_TIMEOUT_SECS` | unset (no timeout)         |

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_DB_FILE_NAME: &str = "memlane_local.sqlite3";

const ENV_API_URL: &str = "MEMLANE_API_URL";
const ENV_STORE_URL: &str = "MEMLANE_STORE_URL";
const ENV_DB_PATH: &str = "MEMLANE_DB_PATH";
const ENV_HTTP_TIMEOUT_SECS: &str = "MEMLANE_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value for `{key}`: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Endpoints and local paths used by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Legacy REST API base URL.
    pub api_base_url: String,
    /// Hosted record store base URL, when one is configured.
    pub store_base_url: Option<String>,
    /// Local SQLite file for device-only state.
    pub db_path: PathBuf,
    /// Applied to every HTTP request when set.
    pub http_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            store_base_url: None,
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            http_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = read(ENV_API_URL) {
            config.api_base_url = url;
        }
        config.store_base_url = read(ENV_STORE_URL);
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_HTTP_TIMEOUT_SECS) {
            let seconds = raw
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_HTTP_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.http_timeout = Some(Duration::from_secs(seconds));
        }
        Ok(config)
    }
}
