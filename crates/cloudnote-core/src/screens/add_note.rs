use super::Transition;
use crate::models::{NoteFields, Username};
use crate::navigation::Route;
use crate::session::{NoteForm, Session};
use crate::store::DocumentStore;
use crate::Result;

/// Add-note screen; its inputs live in `Session::note`.
#[derive(Debug, Clone)]
pub struct AddNoteScreen {
    username: Username,
}

impl AddNoteScreen {
    /// Enter the screen with empty title and content inputs.
    pub fn enter(username: Username, session: &mut Session) -> Self {
        session.note = NoteForm::default();
        Self { username }
    }

    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Write a new note and return to Home once the store accepted it.
    ///
    /// Blank titles and contents are stored as typed.
    pub async fn save(&self, store: &dyn DocumentStore, session: &mut Session) -> Result<Transition> {
        let fields = NoteFields::new(session.note.title.clone(), session.note.content.clone());
        let id = store.add_note(&self.username, &fields).await?;
        tracing::info!("Added note {id} for {}", self.username);

        session.note = NoteForm::default();
        Ok(self.home())
    }

    /// Leave without writing.
    pub fn discard(&self, session: &mut Session) -> Transition {
        session.note = NoteForm::default();
        self.home()
    }

    fn home(&self) -> Transition {
        Transition::Navigate(Route::Home {
            username: self.username.clone(),
        })
    }
}
