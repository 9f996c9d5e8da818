use cloudnote_core::{Action, App, NoteId};

use crate::cli::Credentials;
use crate::commands::common::{ensure_no_failure, normalize_note_identifier, sign_in};
use crate::commands::editor::Editor;
use crate::error::CliError;

/// What to change on an existing note
#[derive(Debug, Clone, Default)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub use_editor: bool,
}

pub async fn run_edit(
    app: &mut App,
    credentials: &Credentials,
    id: &str,
    edit: NoteEdit,
) -> Result<(), CliError> {
    let note_id = edit_note(app, credentials, id, edit).await?;
    println!("{note_id}");
    Ok(())
}

pub async fn edit_note(
    app: &mut App,
    credentials: &Credentials,
    id: &str,
    edit: NoteEdit,
) -> Result<NoteId, CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    if edit.title.is_none() && edit.content.is_none() && !edit.use_editor {
        return Err(CliError::NothingToEdit);
    }

    sign_in(app, credentials).await?;
    app.dispatch(Action::OpenNoteById(normalized_id)).await?;
    let Some(note_id) = app.edit_note().map(|screen| screen.note().id.clone()) else {
        return Err(CliError::Rejected("Could not open the note".to_string()));
    };

    let content = if edit.use_editor {
        let initial = app.session().note.content.clone();
        Some(Editor::from_env().edit(&initial)?)
    } else {
        edit.content
    };

    if let Some(title) = edit.title {
        app.dispatch(Action::SetNoteTitle(title)).await?;
    }
    if let Some(content) = content {
        app.dispatch(Action::SetNoteContent(content)).await?;
    }
    app.dispatch(Action::Save).await?;
    ensure_no_failure(app)?;
    Ok(note_id)
}
