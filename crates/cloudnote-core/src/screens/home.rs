use super::Transition;
use crate::models::{NoteCard, Username};
use crate::navigation::Route;
use crate::store::DocumentStore;
use crate::{Error, Result};

/// Home screen: the signed-in user's notes.
#[derive(Debug, Clone)]
pub struct HomeScreen {
    username: Username,
    notes: Vec<NoteCard>,
    loaded: bool,
}

impl HomeScreen {
    pub const fn new(username: Username) -> Self {
        Self {
            username,
            notes: Vec::new(),
            loaded: false,
        }
    }

    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Cards in store order
    pub fn notes(&self) -> &[NoteCard] {
        &self.notes
    }

    /// Whether a load has completed since the screen was entered
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch the notes collection and replace the list with it.
    ///
    /// On failure the previous list is kept.
    pub async fn load(&mut self, store: &dyn DocumentStore) -> Result<usize> {
        let notes = store.list_notes(&self.username).await?;
        self.notes = notes.into_iter().map(NoteCard::from).collect();
        self.loaded = true;
        tracing::debug!("Loaded {} notes for {}", self.notes.len(), self.username);
        Ok(self.notes.len())
    }

    /// Open the card at `index` in the editor.
    pub fn open(&self, index: usize) -> Result<Transition> {
        let card = self
            .notes
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("no note at position {}", index + 1)))?;
        Ok(self.edit_transition(card))
    }

    /// Open the card whose id equals or starts with `query`.
    pub fn open_by_id(&self, query: &str) -> Result<Transition> {
        let card = self.find(query)?;
        Ok(self.edit_transition(card))
    }

    /// Resolve a full note id or a unique id prefix.
    pub fn find(&self, query: &str) -> Result<&NoteCard> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("note id cannot be empty".to_string()));
        }

        if let Some(card) = self.notes.iter().find(|card| card.id().as_str() == query) {
            return Ok(card);
        }

        let matching = self
            .notes
            .iter()
            .filter(|card| card.id().as_str().starts_with(query))
            .collect::<Vec<_>>();

        match matching.as_slice() {
            [] => Err(Error::NotFound(format!("note '{query}'"))),
            [card] => Ok(*card),
            _ => {
                let options = matching
                    .iter()
                    .take(3)
                    .map(|card| card.id().as_str().chars().take(13).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::AmbiguousNoteId(format!(
                    "ID prefix '{query}' is ambiguous; matches: {options}"
                )))
            }
        }
    }

    pub fn add_note(&self) -> Transition {
        Transition::Navigate(Route::AddNote {
            username: self.username.clone(),
        })
    }

    fn edit_transition(&self, card: &NoteCard) -> Transition {
        Transition::Navigate(Route::EditNote {
            username: self.username.clone(),
            note: card.note.clone(),
        })
    }
}
