//! Store and client configuration.
//!
//! A [`StoreConfig`] names one backend and everything needed to open it.
//! Front ends build it from profiles or flags, or read it from the
//! environment with [`StoreConfig::from_env`].

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::FirestoreConfig;
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

pub const ENV_STORE: &str = "CLOUDNOTE_STORE";
pub const ENV_DB_PATH: &str = "CLOUDNOTE_DB_PATH";
pub const ENV_TURSO_URL: &str = "TURSO_DATABASE_URL";
pub const ENV_TURSO_AUTH_TOKEN: &str = "TURSO_AUTH_TOKEN";
pub const ENV_FIRESTORE_PROJECT_ID: &str = "FIRESTORE_PROJECT_ID";
pub const ENV_FIRESTORE_API_KEY: &str = "FIRESTORE_API_KEY";
pub const ENV_FIRESTORE_ACCESS_TOKEN: &str = "FIRESTORE_ACCESS_TOKEN";
pub const ENV_FIRESTORE_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";
pub const ENV_TIMEOUT_SECS: &str = "CLOUDNOTE_TIMEOUT_SECS";

/// Upper bound on a single store call made by the app controller.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Which document store backend to use.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StoreConfig {
    /// In-process store; nothing survives the process
    Memory,
    /// Local libSQL database file
    Local { path: PathBuf },
    /// Remote Turso database
    Turso { url: String, auth_token: String },
    /// Local file kept in sync with a Turso database
    Replica {
        path: PathBuf,
        url: String,
        auth_token: String,
    },
    /// Cloud Firestore over REST
    Firestore(FirestoreConfig),
}

impl StoreConfig {
    /// Backend name as written in `CLOUDNOTE_STORE` and profiles
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Local { .. } => "local",
            Self::Turso { .. } => "turso",
            Self::Replica { .. } => "replica",
            Self::Firestore(_) => "firestore",
        }
    }

    /// Load a store configuration from environment variables.
    ///
    /// Returns `Ok(None)` when nothing store-related is set.
    /// Returns an error when the selected backend is only partly configured.
    pub fn from_env() -> Result<Option<Self>> {
        parse_store_config(|key| env::var(key).ok())
    }

    /// Check the configuration is complete enough to open.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Memory => Ok(()),
            Self::Local { path } => validate_path(path),
            Self::Turso { url, auth_token } => validate_remote(url, auth_token),
            Self::Replica {
                path,
                url,
                auth_token,
            } => {
                validate_path(path)?;
                validate_remote(url, auth_token)
            }
            Self::Firestore(firestore) => {
                if firestore.project_id.trim().is_empty() {
                    return Err(Error::Config("Firestore project id is empty".to_string()));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Local { path } => f.debug_struct("Local").field("path", path).finish(),
            Self::Turso { url, .. } => f
                .debug_struct("Turso")
                .field("url", url)
                .field("auth_token", &"[REDACTED]")
                .finish(),
            Self::Replica { path, url, .. } => f
                .debug_struct("Replica")
                .field("path", path)
                .field("url", url)
                .field("auth_token", &"[REDACTED]")
                .finish(),
            Self::Firestore(firestore) => f.debug_tuple("Firestore").field(firestore).finish(),
        }
    }
}

/// Settings for one running client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub const fn new(store: StoreConfig) -> Self {
        Self {
            store,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Read `CLOUDNOTE_TIMEOUT_SECS`, if set.
pub fn request_timeout_from_env() -> Result<Option<Duration>> {
    parse_request_timeout(|key| env::var(key).ok())
}

fn parse_request_timeout(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Duration>> {
    let Some(raw) = normalize_text_option(lookup(ENV_TIMEOUT_SECS)) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(Error::Config(format!(
            "{ENV_TIMEOUT_SECS} must be a positive number of seconds, got '{raw}'"
        ))),
    }
}

fn parse_store_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<StoreConfig>> {
    let get = |key: &str| normalize_text_option(lookup(key));

    let kind = get(ENV_STORE).map(|value| value.to_ascii_lowercase());
    let db_path = get(ENV_DB_PATH).map(PathBuf::from);
    let turso_url = get(ENV_TURSO_URL);
    let turso_token = get(ENV_TURSO_AUTH_TOKEN);
    let project_id = get(ENV_FIRESTORE_PROJECT_ID);

    // Without an explicit kind, infer it from whichever backend is configured.
    let kind = match kind {
        Some(kind) => kind,
        None if project_id.is_some() => "firestore".to_string(),
        None if turso_url.is_some() && db_path.is_some() => "replica".to_string(),
        None if turso_url.is_some() => "turso".to_string(),
        None if db_path.is_some() => "local".to_string(),
        None => return Ok(None),
    };

    let config = match kind.as_str() {
        "memory" => StoreConfig::Memory,
        "local" => StoreConfig::Local {
            path: require(db_path, &[ENV_DB_PATH])?,
        },
        "turso" => {
            let (url, auth_token) = require_remote(turso_url, turso_token)?;
            StoreConfig::Turso { url, auth_token }
        }
        "replica" => {
            let path = require(db_path, &[ENV_DB_PATH])?;
            let (url, auth_token) = require_remote(turso_url, turso_token)?;
            StoreConfig::Replica {
                path,
                url,
                auth_token,
            }
        }
        "firestore" => {
            let mut firestore = FirestoreConfig::new(require(project_id, &[ENV_FIRESTORE_PROJECT_ID])?);
            firestore.api_key = get(ENV_FIRESTORE_API_KEY);
            firestore.access_token = get(ENV_FIRESTORE_ACCESS_TOKEN);
            firestore.emulator_host = get(ENV_FIRESTORE_EMULATOR_HOST);
            StoreConfig::Firestore(firestore)
        }
        other => {
            return Err(Error::Config(format!(
                "{ENV_STORE} must be one of memory, local, turso, replica, firestore; got '{other}'"
            )))
        }
    };

    config.validate()?;
    Ok(Some(config))
}

fn require<T>(value: Option<T>, keys: &[&str]) -> Result<T> {
    value.ok_or_else(|| {
        Error::Config(format!(
            "store configuration is incomplete. Missing: {}",
            keys.join(", ")
        ))
    })
}

fn require_remote(url: Option<String>, token: Option<String>) -> Result<(String, String)> {
    let mut missing = Vec::new();
    if url.is_none() {
        missing.push(ENV_TURSO_URL);
    }
    if token.is_none() {
        missing.push(ENV_TURSO_AUTH_TOKEN);
    }
    match (url, token) {
        (Some(url), Some(token)) => Ok((url, token)),
        _ => require(None, &missing),
    }
}

fn validate_path(path: &std::path::Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::Config("database path is empty".to_string()));
    }
    Ok(())
}

fn validate_remote(url: &str, auth_token: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("libsql://") || is_http_url(url)) {
        return Err(Error::Config(format!(
            "Turso URL must start with libsql://, http:// or https://, got '{url}'"
        )));
    }
    if auth_token.trim().is_empty() {
        return Err(Error::Config("Turso auth token is empty".to_string()));
    }
    Ok(())
}
