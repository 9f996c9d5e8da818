//! Document store clients.
//!
//! Every backend exposes the same document layout:
//!
//! - `users/{username}` holding `{password}`
//! - `users/{username}/notes/{id}` holding `{title, content}`
//!
//! The [`DocumentStore`] trait is the only thing screens and the app
//! controller talk to, so backends can be swapped through configuration.

mod firestore;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::db::LibSqlStore;
use crate::models::{Note, NoteFields, NoteId, UserDocument, Username};
use crate::Result;

pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;

/// Asynchronous client for the users/notes document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;

    /// Point read of `users/{username}`
    async fn get_user(&self, username: &Username) -> Result<Option<UserDocument>>;

    /// Create `users/{username}` unless it already exists.
    ///
    /// Returns `false` without writing when the key is taken.
    async fn create_user(&self, username: &Username, document: &UserDocument) -> Result<bool>;

    /// Fetch the whole `users/{username}/notes` collection in store order
    async fn list_notes(&self, username: &Username) -> Result<Vec<Note>>;

    /// Add a note with a store-assigned id
    async fn add_note(&self, username: &Username, fields: &NoteFields) -> Result<NoteId>;

    /// Replace the note document at `id` with `fields`
    async fn set_note(&self, username: &Username, id: &NoteId, fields: &NoteFields)
        -> Result<()>;

    /// Delete the note document at `id`. Deleting a missing note succeeds.
    async fn delete_note(&self, username: &Username, id: &NoteId) -> Result<()>;
}

/// Shared handle to a store backend.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Open the backend described by `config`.
pub async fn open_store(config: &StoreConfig) -> Result<SharedStore> {
    let store: SharedStore = match config {
        StoreConfig::Memory => {
            tracing::info!("Using in-memory note store (nothing is persisted)");
            Arc::new(MemoryStore::new())
        }
        StoreConfig::Local { path } => {
            tracing::info!("Using local libSQL note store at {}", path.display());
            Arc::new(LibSqlStore::open_local_path(path.clone()).await?)
        }
        StoreConfig::Turso { url, auth_token } => {
            tracing::info!("Using remote Turso note store: {url}");
            Arc::new(LibSqlStore::open_remote(url.clone(), auth_token.clone()).await?)
        }
        StoreConfig::Replica {
            path,
            url,
            auth_token,
        } => {
            tracing::info!(
                "Using Turso embedded replica at {} (remote: {url})",
                path.display()
            );
            Arc::new(
                LibSqlStore::open_replica_path(path.clone(), url.clone(), auth_token.clone())
                    .await?,
            )
        }
        StoreConfig::Firestore(firestore) => {
            tracing::info!("Using Firestore project '{}'", firestore.project_id);
            Arc::new(FirestoreStore::new(firestore.clone())?)
        }
    };
    Ok(store)
}
