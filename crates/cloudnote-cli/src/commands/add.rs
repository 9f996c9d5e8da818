use cloudnote_core::models::{display_text, NO_TITLE_PLACEHOLDER};
use cloudnote_core::{Action, App};

use crate::cli::Credentials;
use crate::commands::common::{ensure_no_failure, resolve_note_content, sign_in};
use crate::error::CliError;

pub async fn run_add(
    app: &mut App,
    credentials: &Credentials,
    title: &str,
    content_parts: &[String],
) -> Result<(), CliError> {
    let content = resolve_note_content(content_parts)?;
    add_note(app, credentials, title, &content).await?;
    println!("Saved \"{}\"", display_text(title, NO_TITLE_PLACEHOLDER));
    Ok(())
}

pub async fn add_note(
    app: &mut App,
    credentials: &Credentials,
    title: &str,
    content: &str,
) -> Result<(), CliError> {
    sign_in(app, credentials).await?;

    app.dispatch(Action::NewNote).await?;
    app.dispatch(Action::SetNoteTitle(title.to_string())).await?;
    app.dispatch(Action::SetNoteContent(content.to_string()))
        .await?;
    app.dispatch(Action::Save).await?;
    ensure_no_failure(app)
}
