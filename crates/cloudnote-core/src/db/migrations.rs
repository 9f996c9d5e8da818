//! Versioned schema for the notes database

use crate::error::Result;
use libsql::Connection;

/// Schema steps, applied in order. A step's statements run in one transaction
/// that also records its version.
const MIGRATIONS: &[(i64, &[&str])] = &[(
    1,
    // Notes carry no foreign key to users. Like a document sub-collection,
    // a user's notes may exist without the user document.
    &[
        "CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password TEXT,
            created_at INTEGER NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS notes (
            username TEXT NOT NULL,
            id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (username, id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_notes_username_created ON notes(username, created_at)",
    ],
)];

/// Bring the schema up to the newest version.
pub async fn run(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        (),
    )
    .await?;

    let current = current_version(conn).await?;
    for (version, statements) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
        apply(conn, *version, statements).await?;
        tracing::info!("Migrated notes database to version {version}");
    }
    Ok(())
}

async fn current_version(conn: &Connection) -> Result<i64> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}

// Remote connections have no execute_batch, so statements go one at a time.
async fn apply(conn: &Connection, version: i64, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let outcome: Result<()> = async {
        for statement in statements {
            conn.execute(statement, ()).await?;
        }
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            libsql::params![version],
        )
        .await?;
        conn.execute("COMMIT", ()).await?;
        Ok(())
    }
    .await;

    if outcome.is_err() {
        conn.execute("ROLLBACK", ()).await.ok();
    }
    outcome
}
