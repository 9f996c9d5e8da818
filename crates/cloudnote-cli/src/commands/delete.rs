use cloudnote_core::{Action, App, NoteId};

use crate::cli::Credentials;
use crate::commands::common::{ensure_no_failure, normalize_note_identifier, sign_in};
use crate::error::CliError;

pub async fn run_delete(app: &mut App, credentials: &Credentials, id: &str) -> Result<(), CliError> {
    let note_id = delete_note(app, credentials, id).await?;
    println!("{note_id}");
    Ok(())
}

pub async fn delete_note(
    app: &mut App,
    credentials: &Credentials,
    id: &str,
) -> Result<NoteId, CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    sign_in(app, credentials).await?;

    app.dispatch(Action::OpenNoteById(normalized_id)).await?;
    let Some(note_id) = app.edit_note().map(|screen| screen.note().id.clone()) else {
        return Err(CliError::Rejected("Could not open the note".to_string()));
    };

    app.dispatch(Action::Delete).await?;
    ensure_no_failure(app)?;
    Ok(note_id)
}
