use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cloudnote_core::auth::{INVALID_PASSWORD, USERNAME_EXISTS};
use cloudnote_core::config::StoreConfig;
use cloudnote_core::models::{Note, NoteCard, NoteFields, NoteId, Username, NO_TITLE_PLACEHOLDER};
use cloudnote_core::navigation::{Route, ScreenKind};
use cloudnote_core::store::{DocumentStore, FirestoreConfig, MemoryStore};
use cloudnote_core::{Action, App};
use pretty_assertions::assert_eq;

use crate::cli::{CompletionShell, Credentials, StoreArgs, StoreKind};
use crate::commands::add::add_note;
use crate::commands::auth_cmd::{run_login, run_signup};
use crate::commands::common::{
    format_note_lines, normalize_content, normalize_note_identifier,
    note_preview, note_to_list_item, resolve_request_timeout, resolve_store_config, sign_in,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{apply_profile_update, describe_store, ProfileUpdate};
use crate::commands::delete::delete_note;
use crate::commands::edit::{edit_note, NoteEdit};
use crate::commands::shell::{parse_shell_command, render_screen, ShellCommand};
use crate::config_profiles::CliProfile;
use crate::error::CliError;

fn alice() -> Username {
    Username::parse("alice").unwrap()
}

fn alice_credentials() -> Credentials {
    Credentials {
        username: "alice".to_string(),
        password: "pw1".to_string(),
    }
}

/// A fresh controller over a shared store, like one CLI invocation.
fn app_for(store: &Arc<MemoryStore>) -> App {
    App::new(store.clone())
}

async fn store_with_alice() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    run_signup(&mut app_for(&store), "alice", "pw1", "pw1")
        .await
        .unwrap();
    store
}

/// Stands in for a machine with no data directory.
fn no_default_path() -> Result<PathBuf, String> {
    Err("no data directory".to_string())
}

fn card(id: &str, title: &str, content: &str) -> NoteCard {
    NoteCard::from(Note::new(NoteId::new(id), NoteFields::new(title, content)))
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn note_preview_truncates_with_ellipsis() {
    assert_eq!(note_preview("short", 10), "short");
    assert_eq!(note_preview("first  line\nsecond", 40), "first line");
    assert_eq!(note_preview("abcdefghijkl", 8), "abcde...");
}

#[test]
fn normalize_note_identifier_rejects_empty() {
    assert!(matches!(
        normalize_note_identifier("   "),
        Err(CliError::EmptyNoteId)
    ));
    assert_eq!(normalize_note_identifier(" abc ").unwrap(), "abc");
}

#[test]
fn format_note_lines_uses_short_id_and_display_title() {
    let lines = format_note_lines(&[card("0190aaaa-bbbb-7ccc", " ", "Milk, eggs")]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("0190aaaa-bbbb "));
    assert!(lines[0].contains(NO_TITLE_PLACEHOLDER));
    assert!(lines[0].ends_with("Milk, eggs"));
}

#[test]
fn list_item_keeps_raw_and_display_values() {
    let item = note_to_list_item(&card("n1", "", "  body"));
    assert_eq!(item.id, "n1");
    assert_eq!(item.title, NO_TITLE_PLACEHOLDER);
    assert_eq!(item.raw_title, "");
    assert_eq!(item.content, "body");
    assert_eq!(item.raw_content, "  body");
}

#[test]
fn store_defaults_to_local_file() {
    let config =
        resolve_store_config(&StoreArgs::default(), None, None, || {
            Ok(PathBuf::from("/data/cloudnote.db"))
        })
        .unwrap();
    assert_eq!(
        config,
        StoreConfig::Local {
            path: PathBuf::from("/data/cloudnote.db")
        }
    );
}

#[test]
fn environment_wins_over_profile() {
    let profile = CliProfile {
        store: Some(StoreKind::Memory),
        ..CliProfile::default()
    };
    let env_config = StoreConfig::Firestore(FirestoreConfig::new("cloud-note"));

    let config = resolve_store_config(
        &StoreArgs::default(),
        Some(env_config.clone()),
        Some(&profile),
        no_default_path,
    )
    .unwrap();
    assert_eq!(config, env_config);
}

#[test]
fn store_flag_wins_over_environment() {
    let args = StoreArgs {
        kind: Some(StoreKind::Memory),
        ..StoreArgs::default()
    };
    let config = resolve_store_config(
        &args,
        Some(StoreConfig::Firestore(FirestoreConfig::new("cloud-note"))),
        None,
        no_default_path,
    )
    .unwrap();
    assert_eq!(config, StoreConfig::Memory);
}

#[test]
fn profile_store_is_used_without_env_or_flags() {
    let profile = CliProfile {
        store: Some(StoreKind::Turso),
        turso_url: Some("libsql://notes.turso.io".to_string()),
        turso_auth_token: Some("token".to_string()),
        ..CliProfile::default()
    };
    let config =
        resolve_store_config(&StoreArgs::default(), None, Some(&profile), no_default_path)
            .unwrap();
    assert_eq!(config.kind_name(), "turso");
}

#[test]
fn db_path_flag_overrides_local_path() {
    let args = StoreArgs {
        db_path: Some(PathBuf::from("/tmp/override.db")),
        ..StoreArgs::default()
    };
    let env_config = StoreConfig::Local {
        path: PathBuf::from("/tmp/env.db"),
    };
    let config =
        resolve_store_config(&args, Some(env_config), None, no_default_path).unwrap();
    assert_eq!(
        config,
        StoreConfig::Local {
            path: PathBuf::from("/tmp/override.db")
        }
    );
}

#[test]
fn store_flag_without_profile_details_fails() {
    let args = StoreArgs {
        kind: Some(StoreKind::Firestore),
        ..StoreArgs::default()
    };
    let error = resolve_store_config(&args, None, None, no_default_path).unwrap_err();
    assert!(matches!(error, CliError::Config(message) if message.contains("firestore_project_id")));
}

#[test]
fn missing_data_directory_only_matters_for_local_files() {
    let profile = CliProfile {
        store: Some(StoreKind::Firestore),
        firestore_project_id: Some("cloud-note".to_string()),
        ..CliProfile::default()
    };
    let config =
        resolve_store_config(&StoreArgs::default(), None, Some(&profile), no_default_path)
            .unwrap();
    assert_eq!(config.kind_name(), "firestore");

    let error =
        resolve_store_config(&StoreArgs::default(), None, None, no_default_path).unwrap_err();
    assert!(matches!(error, CliError::Config(message) if message == "no data directory"));
}

#[test]
fn request_timeout_precedence() {
    let profile = CliProfile {
        request_timeout_secs: Some(30),
        ..CliProfile::default()
    };
    let flagged = StoreArgs {
        timeout: Some(5),
        ..StoreArgs::default()
    };

    assert_eq!(
        resolve_request_timeout(&flagged, Some(Duration::from_secs(7)), Some(&profile)),
        Some(Duration::from_secs(5))
    );
    assert_eq!(
        resolve_request_timeout(
            &StoreArgs::default(),
            Some(Duration::from_secs(7)),
            Some(&profile)
        ),
        Some(Duration::from_secs(7))
    );
    assert_eq!(
        resolve_request_timeout(&StoreArgs::default(), None, Some(&profile)),
        Some(Duration::from_secs(30))
    );
    assert_eq!(resolve_request_timeout(&StoreArgs::default(), None, None), None);
}

#[test]
fn profile_update_defaults_to_local_and_validates_urls() {
    let mut profile = CliProfile::default();
    apply_profile_update(&mut profile, ProfileUpdate::default()).unwrap();
    assert_eq!(profile.store, Some(StoreKind::Local));

    let mut profile = CliProfile::default();
    let error = apply_profile_update(
        &mut profile,
        ProfileUpdate {
            kind: Some(StoreKind::Turso),
            turso_url: Some("ftp://nope".to_string()),
            turso_auth_token: Some("token".to_string()),
            ..ProfileUpdate::default()
        },
    )
    .unwrap_err();
    assert!(matches!(error, CliError::Config(_)));
}

#[test]
fn profile_update_keeps_saved_values() {
    let mut profile = CliProfile {
        store: Some(StoreKind::Firestore),
        firestore_project_id: Some("cloud-note".to_string()),
        ..CliProfile::default()
    };
    apply_profile_update(
        &mut profile,
        ProfileUpdate {
            firestore_api_key: Some(" key ".to_string()),
            ..ProfileUpdate::default()
        },
    )
    .unwrap();

    assert_eq!(profile.firestore_project_id.as_deref(), Some("cloud-note"));
    assert_eq!(profile.firestore_api_key.as_deref(), Some("key"));
}

#[test]
fn describe_store_hides_tokens() {
    let description = describe_store(&StoreConfig::Turso {
        url: "libsql://notes.turso.io".to_string(),
        auth_token: "very-secret".to_string(),
    });
    assert_eq!(description, "turso libsql://notes.turso.io");
}

#[test]
fn shell_parses_commands_per_screen() {
    assert_eq!(
        parse_shell_command(ScreenKind::Login, "username  alice ").unwrap(),
        Some(ShellCommand::Action(Action::SetLoginUsername(
            "alice".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::Signup, "confirm pw").unwrap(),
        Some(ShellCommand::Action(Action::SetConfirmPassword(
            "pw".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::Home, "open 2").unwrap(),
        Some(ShellCommand::Action(Action::OpenNote(1)))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::Home, "open 0190ab").unwrap(),
        Some(ShellCommand::Action(Action::OpenNoteById(
            "0190ab".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::AddNote, "content Milk\\neggs").unwrap(),
        Some(ShellCommand::Action(Action::SetNoteContent(
            "Milk\neggs".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::EditNote, "title").unwrap(),
        Some(ShellCommand::Action(Action::SetNoteTitle(String::new())))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::Home, "BACK").unwrap(),
        Some(ShellCommand::Action(Action::Back))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::EditNote, "quit").unwrap(),
        Some(ShellCommand::Quit)
    );
    assert_eq!(parse_shell_command(ScreenKind::Home, "   ").unwrap(), None);
}

#[test]
fn shell_keeps_secrets_verbatim() {
    assert_eq!(
        parse_shell_command(ScreenKind::Login, "password  two words\\n ").unwrap(),
        Some(ShellCommand::Action(Action::SetLoginPassword(
            " two words\\n ".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::Signup, "pass a\\nb").unwrap(),
        Some(ShellCommand::Action(Action::SetNewPassword(
            "a\\nb".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::Signup, "confirm a\\nb ").unwrap(),
        Some(ShellCommand::Action(Action::SetConfirmPassword(
            "a\\nb ".to_string()
        )))
    );
    assert_eq!(
        parse_shell_command(ScreenKind::AddNote, "title  Shopping\\nlist ").unwrap(),
        Some(ShellCommand::Action(Action::SetNoteTitle(
            "Shopping\nlist".to_string()
        )))
    );
}

#[test]
fn shell_rejects_commands_from_other_screens() {
    assert!(parse_shell_command(ScreenKind::AddNote, "delete").is_err());
    assert!(parse_shell_command(ScreenKind::Login, "save").is_err());
    assert!(parse_shell_command(ScreenKind::Home, "open 0").is_err());
    assert!(parse_shell_command(ScreenKind::Home, "open").is_err());
}

#[tokio::test]
async fn render_home_lists_cards_and_status() {
    let store = store_with_alice().await;
    add_note(&mut app_for(&store), &alice_credentials(), "Groceries", "Milk, eggs")
        .await
        .unwrap();

    let mut app = app_for(&store);
    sign_in(&mut app, &alice_credentials()).await.unwrap();
    let rendered = render_screen(&app);

    assert!(rendered.starts_with("== home (alice) ==\n"));
    assert!(rendered.contains("  1. Groceries\n     Milk, eggs\n"));
    assert!(rendered.contains("[ok] Login successful."));
}

#[tokio::test]
async fn render_login_masks_password() {
    let mut app = App::new(Arc::new(MemoryStore::new()));
    app.dispatch(Action::SetLoginPassword("secret".to_string()))
        .await
        .unwrap();
    let rendered = render_screen(&app);
    assert!(rendered.contains("password: ******"));
    assert!(!rendered.contains("secret"));
}

#[tokio::test]
async fn signup_twice_is_rejected() {
    let store = store_with_alice().await;
    let error = run_signup(&mut app_for(&store), "alice", "x", "y")
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::Rejected(message) if message == USERNAME_EXISTS));
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let store = store_with_alice().await;
    run_login(&mut app_for(&store), "alice", "pw1").await.unwrap();

    let error = run_login(&mut app_for(&store), "alice", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::Rejected(message) if message == INVALID_PASSWORD));
}

#[tokio::test]
async fn add_edit_delete_by_id_prefix() {
    let store = store_with_alice().await;
    add_note(&mut app_for(&store), &alice_credentials(), "Groceries", "Milk")
        .await
        .unwrap();
    let id = store.list_notes(&alice()).await.unwrap()[0].id.clone();
    let prefix = id.as_str().chars().take(20).collect::<String>();

    let edited = edit_note(
        &mut app_for(&store),
        &alice_credentials(),
        &prefix,
        NoteEdit {
            title: Some(String::new()),
            ..NoteEdit::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(edited, id);
    let notes = store.list_notes(&alice()).await.unwrap();
    assert_eq!(notes[0].fields(), NoteFields::new("", "Milk"));

    let deleted = delete_note(&mut app_for(&store), &alice_credentials(), id.as_str())
        .await
        .unwrap();
    assert_eq!(deleted, id);
    assert!(store.list_notes(&alice()).await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_without_changes_is_rejected_before_store_access() {
    let store = Arc::new(MemoryStore::new());
    let error = edit_note(
        &mut app_for(&store),
        &alice_credentials(),
        "abc",
        NoteEdit::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(error, CliError::NothingToEdit));
}

#[tokio::test]
async fn unknown_note_id_is_reported() {
    let store = store_with_alice().await;
    let error = delete_note(&mut app_for(&store), &alice_credentials(), "missing")
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        CliError::Core(cloudnote_core::Error::NotFound(_))
    ));
}

#[tokio::test]
async fn shell_start_route_comes_from_params() {
    let store = store_with_alice().await;
    let mut app = app_for(&store);
    let params = cloudnote_core::navigation::parse_param_pairs(["KEY_USERNAME=alice"]).unwrap();
    app.start_at(Route::from_params(ScreenKind::AddNote, &params).unwrap())
        .await;

    assert_eq!(app.route(), &Route::AddNote { username: alice() });
    assert!(render_screen(&app).starts_with("== add-note (alice) ==\n"));
}

#[test]
fn bash_completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("_cloudnote()"));
    assert!(script.contains("cloudnote"));
}

#[test]
fn completions_are_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("completions").join("cloudnote.fish");

    crate::commands::completions::run_completions(CompletionShell::Fish, Some(&output_path))
        .unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("complete -c cloudnote"));
}
