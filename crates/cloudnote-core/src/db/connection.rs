//! Database connection management

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use libsql::{Builder, Connection, Database as LibSqlDatabase};

use super::migrations;
use crate::error::Result;

/// How often an embedded replica pulls from its remote.
pub const DEFAULT_REPLICA_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Where the notes database lives.
#[derive(Clone, PartialEq, Eq)]
pub enum Location {
    /// Scratch database that disappears with the connection
    Memory,
    /// A local database file, created on first open
    File(PathBuf),
    /// A Turso database; every statement is a network round trip
    Remote { url: String, auth_token: String },
    /// A local file kept in step with a Turso database.
    ///
    /// Reads are served from the file, writes go to the remote and sync back.
    Replica {
        path: PathBuf,
        url: String,
        auth_token: String,
        sync_interval: Option<Duration>,
    },
}

impl Location {
    /// Embedded replica with the default background sync interval
    pub fn replica(
        path: impl Into<PathBuf>,
        url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self::Replica {
            path: path.into(),
            url: url.into(),
            auth_token: auth_token.into(),
            sync_interval: Some(DEFAULT_REPLICA_SYNC_INTERVAL),
        }
    }

    fn local_path(&self) -> Option<&PathBuf> {
        match self {
            Self::File(path) | Self::Replica { path, .. } => Some(path),
            Self::Memory | Self::Remote { .. } => None,
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Remote { url, .. } => f
                .debug_struct("Remote")
                .field("url", url)
                .field("auth_token", &"[REDACTED]")
                .finish(),
            Self::Replica {
                path,
                url,
                sync_interval,
                ..
            } => f
                .debug_struct("Replica")
                .field("path", path)
                .field("url", url)
                .field("auth_token", &"[REDACTED]")
                .field("sync_interval", sync_interval)
                .finish(),
        }
    }
}

/// An open libSQL database with its schema migrated.
pub struct Database {
    db: LibSqlDatabase,
    conn: Connection,
    replicated: bool,
}

impl Database {
    /// Open the database at `location`, creating local files and parent
    /// directories as needed, and bring the schema up to date.
    pub async fn open(location: &Location) -> Result<Self> {
        if let Some(parent) = location
            .local_path()
            .and_then(|path| path.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = match location {
            Location::Memory => Builder::new_local(":memory:").build().await?,
            Location::File(path) => Builder::new_local(path).build().await?,
            Location::Remote { url, auth_token } => {
                Builder::new_remote(url.clone(), auth_token.clone())
                    .build()
                    .await?
            }
            Location::Replica {
                path,
                url,
                auth_token,
                sync_interval,
            } => {
                let mut builder =
                    Builder::new_remote_replica(path, url.clone(), auth_token.clone());
                if let Some(interval) = sync_interval {
                    builder = builder.sync_interval(*interval);
                }
                let db = builder.build().await?;
                // Pull the remote schema first so migrations do not fork it.
                db.sync().await?;
                db
            }
        };

        let database = Self {
            conn: db.connect()?,
            db,
            replicated: matches!(location, Location::Replica { .. }),
        };
        database.tune().await;
        migrations::run(&database.conn).await?;
        tracing::debug!("Opened notes database {location:?}");
        Ok(database)
    }

    async fn tune(&self) {
        // Remote connections reject these; failing them is harmless.
        for pragma in ["PRAGMA journal_mode = WAL;", "PRAGMA synchronous = NORMAL;"] {
            if let Err(error) = self.conn.execute(pragma, ()).await {
                tracing::debug!("Skipped `{pragma}`: {error}");
            }
        }
    }

    /// Pull remote changes into an embedded replica. No-op otherwise.
    pub async fn sync(&self) -> Result<()> {
        if self.replicated {
            self.db.sync().await?;
            tracing::debug!("Replica synced with remote");
        }
        Ok(())
    }

    pub const fn is_replica(&self) -> bool {
        self.replicated
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
