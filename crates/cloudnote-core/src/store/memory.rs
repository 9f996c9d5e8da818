//! In-process document store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::DocumentStore;
use crate::models::{Note, NoteFields, NoteId, UserDocument, Username};
use crate::Result;

#[derive(Default)]
struct Documents {
    users: BTreeMap<Username, UserDocument>,
    // Insertion order doubles as store order.
    notes: HashMap<Username, Vec<Note>>,
}

/// In-memory store for tests and throwaway sessions.
///
/// Clones share the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<Documents>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of user documents
    pub async fn user_count(&self) -> usize {
        self.documents.lock().await.users.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, username: &Username) -> Result<Option<UserDocument>> {
        Ok(self.documents.lock().await.users.get(username).cloned())
    }

    async fn create_user(&self, username: &Username, document: &UserDocument) -> Result<bool> {
        let mut documents = self.documents.lock().await;
        if documents.users.contains_key(username) {
            return Ok(false);
        }
        documents.users.insert(username.clone(), document.clone());
        Ok(true)
    }

    async fn list_notes(&self, username: &Username) -> Result<Vec<Note>> {
        Ok(self
            .documents
            .lock()
            .await
            .notes
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_note(&self, username: &Username, fields: &NoteFields) -> Result<NoteId> {
        let id = NoteId::generate();
        self.documents
            .lock()
            .await
            .notes
            .entry(username.clone())
            .or_default()
            .push(Note::new(id.clone(), fields.clone()));
        Ok(id)
    }

    async fn set_note(
        &self,
        username: &Username,
        id: &NoteId,
        fields: &NoteFields,
    ) -> Result<()> {
        let mut documents = self.documents.lock().await;
        let notes = documents.notes.entry(username.clone()).or_default();
        if let Some(existing) = notes.iter_mut().find(|note| &note.id == id) {
            *existing = Note::new(id.clone(), fields.clone());
        } else {
            notes.push(Note::new(id.clone(), fields.clone()));
        }
        Ok(())
    }

    async fn delete_note(&self, username: &Username, id: &NoteId) -> Result<()> {
        if let Some(notes) = self.documents.lock().await.notes.get_mut(username) {
            notes.retain(|note| &note.id != id);
        }
        Ok(())
    }
}
