//! Configuration loading and representation.
//!
//! Everything comes from `WAYPOINT_*` environment variables. Optional values
//! fall back to defaults, announced in the log.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const ENV_DIRECTORY_URL: &str = "WAYPOINT_DIRECTORY_URL";
pub const ENV_DIRECTORY_KEY: &str = "WAYPOINT_DIRECTORY_KEY";
pub const ENV_USERS_TABLE: &str = "WAYPOINT_USERS_TABLE";
pub const ENV_AUTH_RPC: &str = "WAYPOINT_AUTH_RPC";
pub const ENV_SESSION_DIR: &str = "WAYPOINT_SESSION_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "WAYPOINT_HTTP_TIMEOUT_SECS";

const DEFAULT_USERS_TABLE: &str = "users";
const DEFAULT_AUTH_RPC: &str = "verify_credentials";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Where the remote directory lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Always ends with `/`, so relative joins append instead of replacing.
    pub base_url: Url,
    pub api_key: String,
    pub users_table: String,
    pub auth_rpc: String,
    pub timeout: Option<Duration>,
}

impl DirectoryConfig {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            api_key: api_key.into(),
            users_table: DEFAULT_USERS_TABLE.to_string(),
            auth_rpc: DEFAULT_AUTH_RPC.to_string(),
            timeout: None,
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub directory: DirectoryConfig,
    /// Directory holding the persisted session slot.
    pub session_dir: PathBuf,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get(ENV_DIRECTORY_URL).ok_or(ConfigError::Missing(ENV_DIRECTORY_URL))?;
        let base_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::Invalid {
            key: ENV_DIRECTORY_URL,
            message: e.to_string(),
        })?;

        let api_key = get(ENV_DIRECTORY_KEY).ok_or(ConfigError::Missing(ENV_DIRECTORY_KEY))?;

        let mut directory = DirectoryConfig::new(base_url, api_key);
        if let Some(table) = get(ENV_USERS_TABLE) {
            directory.users_table = table;
        }
        if let Some(rpc) = get(ENV_AUTH_RPC) {
            directory.auth_rpc = rpc;
        }
        if let Some(secs) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_HTTP_TIMEOUT_SECS,
                message: format!("expected whole seconds, got '{secs}'"),
            })?;
            directory.timeout = Some(Duration::from_secs(secs));
        }

        let session_dir = match get(ENV_SESSION_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let dir = default_session_dir();
                tracing::info!(path = %dir.display(), "{ENV_SESSION_DIR} not set; using default");
                dir
            }
        };

        Ok(Self {
            directory,
            session_dir,
        })
    }
}

fn default_session_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("waypoint"),
        None => {
            tracing::warn!("no platform data directory; keeping the session next to the binary");
            PathBuf::from(".waypoint")
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
