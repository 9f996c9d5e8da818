use std::path::PathBuf;

use cloudnote_core::config::StoreConfig;
use cloudnote_core::util::normalize_text_option;

use crate::cli::{ConfigCommands, StoreArgs, StoreKind};
use crate::commands::common::{default_db_path, resolve_app_config};
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    store_args: &StoreArgs,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            kind,
            db_path,
            turso_url,
            turso_auth_token,
            firestore_project,
            firestore_api_key,
            firestore_emulator_host,
            timeout,
            no_activate,
        } => {
            let update = ProfileUpdate {
                kind,
                db_path,
                turso_url,
                turso_auth_token,
                firestore_project_id: firestore_project,
                firestore_api_key,
                firestore_emulator_host,
                request_timeout_secs: timeout,
            };
            run_config_init(profile.as_deref().or(global_profile), update, no_activate)
        }
        ConfigCommands::Show { profile } => {
            run_config_show(profile.as_deref().or(global_profile), store_args)
        }
    }
}

/// Explicit values for `config init`; unset fields keep the saved value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub kind: Option<StoreKind>,
    pub db_path: Option<PathBuf>,
    pub turso_url: Option<String>,
    pub turso_auth_token: Option<String>,
    pub firestore_project_id: Option<String>,
    pub firestore_api_key: Option<String>,
    pub firestore_emulator_host: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

pub fn run_config_init(
    profile_name: Option<&str>,
    update: ProfileUpdate,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    apply_profile_update(profile, update)?;
    let missing_fields = profile.missing_fields();

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    if missing_fields.is_empty() {
        println!("Profile '{profile_name}' is ready. Run `cloudnote shell` to start.");
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

/// Merge explicit values into `profile` and check what was given.
pub fn apply_profile_update(profile: &mut CliProfile, update: ProfileUpdate) -> Result<(), CliError> {
    if let Some(kind) = update.kind {
        profile.store = Some(kind);
    }
    if profile.store.is_none() {
        profile.store = Some(StoreKind::Local);
    }
    if let Some(path) = update.db_path {
        profile.db_path = Some(path);
    }
    if let Some(value) = normalize_text_option(update.turso_url) {
        profile.turso_url = Some(value);
    }
    if let Some(value) = normalize_text_option(update.turso_auth_token) {
        profile.turso_auth_token = Some(value);
    }
    if let Some(value) = normalize_text_option(update.firestore_project_id) {
        profile.firestore_project_id = Some(value);
    }
    if let Some(value) = normalize_text_option(update.firestore_api_key) {
        profile.firestore_api_key = Some(value);
    }
    if let Some(value) = normalize_text_option(update.firestore_emulator_host) {
        profile.firestore_emulator_host = Some(value);
    }
    if let Some(secs) = update.request_timeout_secs {
        if secs == 0 {
            return Err(CliError::Config(
                "timeout must be a positive number of seconds".to_string(),
            ));
        }
        profile.request_timeout_secs = Some(secs);
    }

    // Complete profiles must also produce a valid store configuration.
    if let (Some(kind), true) = (profile.store, profile.missing_fields().is_empty()) {
        profile
            .store_config(kind, || {
                Ok(default_db_path().unwrap_or_else(|_| PathBuf::from("cloudnote.db")))
            })
            .map_err(CliError::Config)?;
    }
    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>, store_args: &StoreArgs) -> Result<(), CliError> {
    let (profile_name, config) = resolve_app_config(profile_name, store_args)?;
    println!("profile: {profile_name}");
    println!("store:   {}", describe_store(&config.store));
    println!("timeout: {}s", config.request_timeout.as_secs());
    Ok(())
}

/// One-line description without secrets
pub fn describe_store(config: &StoreConfig) -> String {
    match config {
        StoreConfig::Memory => "memory (not persisted)".to_string(),
        StoreConfig::Local { path } => format!("local {}", path.display()),
        StoreConfig::Turso { url, .. } => format!("turso {url}"),
        StoreConfig::Replica { path, url, .. } => {
            format!("replica {} of {url}", path.display())
        }
        StoreConfig::Firestore(firestore) => format!("firestore {}", firestore.documents_url()),
    }
}
