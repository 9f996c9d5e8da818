use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use cloudnote_core::config::{request_timeout_from_env, AppConfig, StoreConfig};
use cloudnote_core::models::NoteCard;
use cloudnote_core::navigation::ScreenKind;
use cloudnote_core::store::open_store;
use cloudnote_core::{Action, App};
use serde::Serialize;

use crate::cli::{Credentials, StoreArgs};
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub raw_title: String,
    pub raw_content: String,
}

pub fn note_to_list_item(card: &NoteCard) -> NoteListItem {
    NoteListItem {
        id: card.id().to_string(),
        title: card.title.clone(),
        content: card.content.clone(),
        raw_title: card.note.title.clone(),
        raw_content: card.note.content.clone(),
    }
}

pub fn format_note_lines(cards: &[NoteCard]) -> Vec<String> {
    cards
        .iter()
        .map(|card| {
            let short_id = card.id().as_str().chars().take(13).collect::<String>();
            let title = note_preview(&card.title, 24);
            let preview = note_preview(&card.content, 40);
            format!("{short_id:<13}  {title:<24}  {preview}")
        })
        .collect()
}

/// First line of `text`, whitespace collapsed and cut to `max_chars`.
pub fn note_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Content from the arguments, else from piped stdin, else empty.
pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if !content_parts.is_empty() {
        return Ok(content_parts.join(" "));
    }
    Ok(read_piped_stdin()?.unwrap_or_default())
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn default_db_path() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join("cloudnote").join("cloudnote.db"))
        .ok_or_else(|| "Failed to resolve CLI data directory".to_string())
}

/// Pick the store: flags, then environment, then the profile, then a local file.
///
/// `default_db_path` is only called when a file-backed store has no path.
pub fn resolve_store_config(
    args: &StoreArgs,
    env_config: Option<StoreConfig>,
    profile: Option<&CliProfile>,
    default_db_path: impl FnOnce() -> Result<PathBuf, String>,
) -> Result<StoreConfig, CliError> {
    let fallback = CliProfile::default();
    let profile = profile.unwrap_or(&fallback);

    let config = match (args.kind, env_config) {
        (Some(kind), Some(env_config)) if env_config.kind_name() == kind.name() => env_config,
        (Some(kind), _) => profile
            .store_config(kind, default_db_path)
            .map_err(CliError::Config)?,
        (None, Some(env_config)) => env_config,
        (None, None) => match profile.store {
            Some(kind) => profile
                .store_config(kind, default_db_path)
                .map_err(CliError::Config)?,
            None => StoreConfig::Local {
                path: default_db_path().map_err(CliError::Config)?,
            },
        },
    };

    Ok(match (config, args.db_path.clone()) {
        (StoreConfig::Local { .. }, Some(path)) => StoreConfig::Local { path },
        (
            StoreConfig::Replica {
                url, auth_token, ..
            },
            Some(path),
        ) => StoreConfig::Replica {
            path,
            url,
            auth_token,
        },
        (config, _) => config,
    })
}

pub fn resolve_request_timeout(
    args: &StoreArgs,
    env_timeout: Option<Duration>,
    profile: Option<&CliProfile>,
) -> Option<Duration> {
    args.timeout
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .or(env_timeout)
        .or_else(|| {
            profile
                .and_then(|profile| profile.request_timeout_secs)
                .map(Duration::from_secs)
        })
}

/// Resolve the full client configuration for this invocation.
pub fn resolve_app_config(
    global_profile: Option<&str>,
    args: &StoreArgs,
) -> Result<(String, AppConfig), CliError> {
    let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = profiles.resolve_profile_name(global_profile);
    let profile = profiles.profile(&profile_name);

    let store = resolve_store_config(args, StoreConfig::from_env()?, profile, default_db_path)?;
    let mut config = AppConfig::new(store);
    if let Some(timeout) = resolve_request_timeout(args, request_timeout_from_env()?, profile) {
        config = config.with_request_timeout(timeout);
    }
    Ok((profile_name, config))
}

pub async fn open_app(config: &AppConfig) -> Result<App, CliError> {
    let store = open_store(&config.store).await?;
    Ok(App::new(store).with_request_timeout(config.request_timeout))
}

pub async fn connect(global_profile: Option<&str>, args: &StoreArgs) -> Result<App, CliError> {
    let (profile_name, config) = resolve_app_config(global_profile, args)?;
    tracing::debug!("Using profile '{profile_name}' with {:?}", config.store);
    open_app(&config).await
}

/// Log in through the Login screen and stop unless Home was reached.
pub async fn sign_in(app: &mut App, credentials: &Credentials) -> Result<(), CliError> {
    app.dispatch(Action::SetLoginUsername(credentials.username.clone()))
        .await?;
    app.dispatch(Action::SetLoginPassword(credentials.password.clone()))
        .await?;
    app.dispatch(Action::SubmitLogin).await?;

    if app.route().kind() != ScreenKind::Home {
        return Err(rejected(app));
    }
    ensure_no_failure(app)
}

/// Turn a failure status on the current screen into an error.
pub fn ensure_no_failure(app: &App) -> Result<(), CliError> {
    match app.status() {
        Some(status) if !status.is_success() => Err(CliError::Rejected(status.message.clone())),
        _ => Ok(()),
    }
}

/// Print a success status, or fail with the failure status.
pub fn finish_with_status(app: &App) -> Result<(), CliError> {
    ensure_no_failure(app)?;
    if let Some(status) = app.status() {
        println!("{}", status.message);
    }
    Ok(())
}

fn rejected(app: &App) -> CliError {
    CliError::Rejected(app.status().map_or_else(
        || "Request was not completed".to_string(),
        |status| status.message.clone(),
    ))
}
