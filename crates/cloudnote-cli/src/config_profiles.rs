//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use cloudnote_core::config::StoreConfig;
use cloudnote_core::store::FirestoreConfig;
use cloudnote_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::cli::StoreKind;

const CONFIG_FILE_NAME: &str = "cli-config.json";
const PROFILE_ENV: &str = "CLOUDNOTE_PROFILE";
const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

/// Store settings saved under one profile name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub store: Option<StoreKind>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default)]
    pub firestore_project_id: Option<String>,
    #[serde(default)]
    pub firestore_api_key: Option<String>,
    #[serde(default)]
    pub firestore_emulator_host: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("cloudnote").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

fn describe_io(action: &str, path: &Path, error: impl std::fmt::Display) -> String {
    format!("Failed to {action} {}: {error}", path.display())
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    /// Read profiles from `path`. A missing file means no profiles yet.
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => return Err(describe_io("read config", path, error)),
        };

        let mut config: Self =
            serde_json::from_str(&raw).map_err(|error| describe_io("parse config", path, error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// Write profiles to `path` via a temporary file in the same directory.
    /// A failed write leaves the old file intact.
    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .map_err(|error| describe_io("create config directory", dir, error))?;

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;

        let mut staged = NamedTempFile::new_in(dir)
            .map_err(|error| describe_io("stage config in", dir, error))?;
        staged
            .write_all(serialized.as_bytes())
            .map_err(|error| describe_io("write config", staged.path(), error))?;
        staged
            .persist(path)
            .map_err(|error| describe_io("write config", path, error))?;
        Ok(())
    }

    /// Profile to use: explicit name, then `CLOUDNOTE_PROFILE`, then the
    /// active profile, then `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        [
            explicit.map(str::to_string),
            std::env::var(PROFILE_ENV).ok(),
            self.active_profile.clone(),
        ]
        .into_iter()
        .find_map(normalize_text_option)
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        if self.version == 0 {
            self.version = default_config_version();
        }
        self.active_profile = normalize_text_option(self.active_profile.take());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    /// Build the store configuration for `kind` from this profile.
    ///
    /// `default_db_path` is called only for a file-backed kind when the
    /// profile has no path of its own.
    pub fn store_config(
        &self,
        kind: StoreKind,
        default_db_path: impl FnOnce() -> Result<PathBuf, String>,
    ) -> Result<StoreConfig, String> {
        let db_path = || match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        };
        let config = match kind {
            StoreKind::Memory => StoreConfig::Memory,
            StoreKind::Local => StoreConfig::Local { path: db_path()? },
            StoreKind::Turso => StoreConfig::Turso {
                url: required("turso_url", self.turso_url.as_ref())?,
                auth_token: required("turso_auth_token", self.turso_auth_token.as_ref())?,
            },
            StoreKind::Replica => StoreConfig::Replica {
                path: db_path()?,
                url: required("turso_url", self.turso_url.as_ref())?,
                auth_token: required("turso_auth_token", self.turso_auth_token.as_ref())?,
            },
            StoreKind::Firestore => {
                let project_id =
                    required("firestore_project_id", self.firestore_project_id.as_ref())?;
                let mut firestore = FirestoreConfig::new(project_id);
                firestore.api_key = self.firestore_api_key.clone();
                firestore.emulator_host = self.firestore_emulator_host.clone();
                StoreConfig::Firestore(firestore)
            }
        };
        config.validate().map_err(|error| error.to_string())?;
        Ok(config)
    }

    /// Fields the profile's store kind needs but does not have
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self.store {
            Some(StoreKind::Turso | StoreKind::Replica) => {
                if self.turso_url.is_none() {
                    missing.push("turso_url");
                }
                if self.turso_auth_token.is_none() {
                    missing.push("turso_auth_token");
                }
            }
            Some(StoreKind::Firestore) => {
                if self.firestore_project_id.is_none() {
                    missing.push("firestore_project_id");
                }
            }
            Some(StoreKind::Memory | StoreKind::Local) => {}
            None => missing.push("store"),
        }
        missing
    }

    fn normalize(&mut self) {
        self.turso_url = normalize_text_option(self.turso_url.clone());
        self.turso_auth_token = normalize_text_option(self.turso_auth_token.clone());
        self.firestore_project_id = normalize_text_option(self.firestore_project_id.clone());
        self.firestore_api_key = normalize_text_option(self.firestore_api_key.clone());
        self.firestore_emulator_host = normalize_text_option(self.firestore_emulator_host.clone());
        if self
            .db_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.db_path = None;
        }
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
    }
}

fn required(field: &str, value: Option<&String>) -> Result<String, String> {
    value
        .cloned()
        .ok_or_else(|| format!("profile is missing {field}; run `cloudnote config init`"))
}
