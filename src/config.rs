//! Process configuration read from the environment (and `.env` via dotenvy).

use std::time::Duration;

use actix_web::cookie::Key;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_BUCKET: &str = "campaign-covers";
const DEFAULT_APP_NAME: &str = "Marketing ATTINI";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Supabase-style HTTP backend.
    Rest,
    /// In-process backend for local demos.
    Memory,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set when REMOTE_BACKEND=rest")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub backend: BackendKind,
    pub remote_url: String,
    pub anon_key: String,
    pub storage_bucket: String,
    pub app_name: String,
    pub http_timeout: Duration,
    session_key: Option<String>,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Could not read .env: {e}");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match var("REMOTE_BACKEND").as_deref() {
            None | Some("rest") => BackendKind::Rest,
            Some("memory") => BackendKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid { var: "REMOTE_BACKEND", value: other.to_string() });
            }
        };

        let remote_url = var("REMOTE_URL").unwrap_or_default();
        let anon_key = var("REMOTE_ANON_KEY").unwrap_or_default();
        if backend == BackendKind::Rest {
            if remote_url.is_empty() {
                return Err(ConfigError::Missing("REMOTE_URL"));
            }
            if anon_key.is_empty() {
                return Err(ConfigError::Missing("REMOTE_ANON_KEY"));
            }
        }

        let http_timeout = match var("HTTP_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid { var: "HTTP_TIMEOUT_SECS", value: raw }),
            },
        };

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            backend,
            remote_url,
            anon_key,
            storage_bucket: var("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            app_name: var("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            http_timeout,
            session_key: var("SESSION_KEY"),
        })
    }

    /// Configuration for tests and demos: memory backend, defaults elsewhere.
    pub fn memory() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            backend: BackendKind::Memory,
            remote_url: String::new(),
            anon_key: String::new(),
            storage_bucket: DEFAULT_BUCKET.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_key: None,
        }
    }

    /// Cookie key from SESSION_KEY. Falls back to a random key (sessions
    /// lost on restart) when unset or shorter than 64 bytes.
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}
