//! libSQL-backed document store.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{params, Value};
use tokio::sync::Mutex;

use super::{Database, Location};
use crate::models::{Note, NoteFields, NoteId, UserDocument, Username};
use crate::store::DocumentStore;
use crate::util::unix_timestamp_millis;
use crate::Result;

/// Thread-safe document store over a libSQL database.
///
/// Works against a local file, a remote Turso database, or an embedded
/// replica of one.
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<Mutex<Database>>,
}

impl LibSqlStore {
    /// Open the database at `location` and wrap it as a store.
    pub async fn open(location: &Location) -> Result<Self> {
        Ok(Self {
            db: Arc::new(Mutex::new(Database::open(location).await?)),
        })
    }

    /// Open (or create) a local database file.
    pub async fn open_local_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&Location::File(db_path.into())).await
    }

    /// Connect to a remote Turso database.
    pub async fn open_remote(url: impl Into<String>, auth_token: impl Into<String>) -> Result<Self> {
        Self::open(&Location::Remote {
            url: url.into(),
            auth_token: auth_token.into(),
        })
        .await
    }

    /// Open an embedded replica of a remote Turso database.
    pub async fn open_replica_path(
        db_path: impl Into<PathBuf>,
        url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self> {
        Self::open(&Location::replica(db_path, url, auth_token)).await
    }

    /// Open an in-memory database (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        Self::open(&Location::Memory).await
    }

    /// Pull remote changes when running as an embedded replica.
    pub async fn sync(&self) -> Result<()> {
        self.db.lock().await.sync().await
    }
}

#[async_trait]
impl DocumentStore for LibSqlStore {
    fn backend_name(&self) -> &'static str {
        "libsql"
    }

    async fn get_user(&self, username: &Username) -> Result<Option<UserDocument>> {
        let db = self.db.lock().await;
        let mut rows = db
            .connection()
            .query(
                "SELECT password FROM users WHERE username = ?1",
                params![username.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(match row.get_value(0)? {
                Value::Text(password) => UserDocument::new(password),
                _ => UserDocument::without_password(),
            })),
            None => Ok(None),
        }
    }

    async fn create_user(&self, username: &Username, document: &UserDocument) -> Result<bool> {
        let db = self.db.lock().await;
        let inserted = db
            .connection()
            .execute(
                "INSERT INTO users (username, password, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(username) DO NOTHING",
                params![
                    username.as_str(),
                    document.password(),
                    unix_timestamp_millis()
                ],
            )
            .await?;
        Ok(inserted == 1)
    }

    async fn list_notes(&self, username: &Username) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        let mut rows = db
            .connection()
            .query(
                "SELECT id, title, content FROM notes
                 WHERE username = ?1
                 ORDER BY created_at ASC, id ASC",
                params![username.as_str()],
            )
            .await?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            notes.push(Note::new(
                NoteId::new(row.get::<String>(0)?),
                NoteFields::new(row.get::<String>(1)?, row.get::<String>(2)?),
            ));
        }
        Ok(notes)
    }

    async fn add_note(&self, username: &Username, fields: &NoteFields) -> Result<NoteId> {
        let id = NoteId::generate();
        let now = unix_timestamp_millis();
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT INTO notes (username, id, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    username.as_str(),
                    id.as_str(),
                    fields.title.as_str(),
                    fields.content.as_str(),
                    now
                ],
            )
            .await?;
        tracing::debug!("Added note {id} for {username}");
        Ok(id)
    }

    async fn set_note(
        &self,
        username: &Username,
        id: &NoteId,
        fields: &NoteFields,
    ) -> Result<()> {
        let now = unix_timestamp_millis();
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT INTO notes (username, id, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(username, id) DO UPDATE SET
                    title = excluded.title,
                    content = excluded.content,
                    updated_at = excluded.updated_at",
                params![
                    username.as_str(),
                    id.as_str(),
                    fields.title.as_str(),
                    fields.content.as_str(),
                    now
                ],
            )
            .await?;
        Ok(())
    }

    async fn delete_note(&self, username: &Username, id: &NoteId) -> Result<()> {
        let db = self.db.lock().await;
        let rows = db
            .connection()
            .execute(
                "DELETE FROM notes WHERE username = ?1 AND id = ?2",
                params![username.as_str(), id.as_str()],
            )
            .await?;
        if rows == 0 {
            tracing::debug!("Delete of missing note {id} for {username} ignored");
        }
        Ok(())
    }
}
