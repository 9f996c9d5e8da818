use super::Transition;
use crate::models::{Note, NoteFields, Username};
use crate::navigation::Route;
use crate::session::{NoteForm, Session};
use crate::store::DocumentStore;
use crate::Result;

/// Edit-note screen for one existing note.
#[derive(Debug, Clone)]
pub struct EditNoteScreen {
    username: Username,
    note: Note,
}

impl EditNoteScreen {
    /// Enter the screen with the inputs set to the stored title and content.
    pub fn enter(username: Username, note: Note, session: &mut Session) -> Self {
        session.note = NoteForm {
            title: note.title.clone(),
            content: note.content.clone(),
        };
        Self { username, note }
    }

    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// The note as it was when the screen was entered
    pub const fn note(&self) -> &Note {
        &self.note
    }

    /// Overwrite the note with the current inputs.
    pub async fn save(&self, store: &dyn DocumentStore, session: &mut Session) -> Result<Transition> {
        let fields = NoteFields::new(session.note.title.clone(), session.note.content.clone());
        store.set_note(&self.username, &self.note.id, &fields).await?;
        tracing::info!("Updated note {} for {}", self.note.id, self.username);

        session.note = NoteForm::default();
        Ok(self.home())
    }

    pub async fn delete(&self, store: &dyn DocumentStore, session: &mut Session) -> Result<Transition> {
        store.delete_note(&self.username, &self.note.id).await?;
        tracing::info!("Deleted note {} for {}", self.note.id, self.username);

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteId;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn alice() -> Username {
        Username::parse("alice").unwrap()
    }

    async fn store_with_groceries() -> (MemoryStore, Note) {
        let store = MemoryStore::new();
        let fields = NoteFields::new("Groceries", "Milk");
        let id = store.add_note(&alice(), &fields).await.unwrap();
        (store, Note::new(id, fields))
    }

    #[tokio::test]
    async fn save_overwrites_in_place() {
        let (store, note) = store_with_groceries().await;
        let mut session = Session::new();
        let screen = EditNoteScreen::enter(alice(), note.clone(), &mut session);
        session.note.content = "Milk, eggs".to_string();

        screen.save(&store, &mut session).await.unwrap();

        let notes = store.list_notes(&alice()).await.unwrap();
        assert_eq!(
            notes,
            vec![Note::new(note.id, NoteFields::new("Groceries", "Milk, eggs"))]
        );
    }

    #[tokio::test]
    async fn delete_removes_note() {
        let (store, note) = store_with_groceries().await;
        let mut session = Session::new();
        let screen = EditNoteScreen::enter(alice(), note, &mut session);

        let transition = screen.delete(&store, &mut session).await.unwrap();

        assert_eq!(transition, Transition::Navigate(Route::Home { username: alice() }));
        assert!(store.list_notes(&alice()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_of_vanished_note_still_returns_home() {
        let store = MemoryStore::new();
        let mut session = Session::new();
        let note = Note::new(NoteId::new("gone"), NoteFields::default());
        let screen = EditNoteScreen::enter(alice(), note, &mut session);

        let transition = screen.delete(&store, &mut session).await.unwrap();

        assert!(matches!(transition, Transition::Navigate(Route::Home { .. })));
    }
}
