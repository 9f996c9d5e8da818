//! Error types for cloudnote-core

use std::time::Duration;

use thiserror::Error;

/// Result type alias using cloudnote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cloudnote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Document store rejected or failed a request
    #[error("Store error: {0}")]
    Store(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A note id prefix matched more than one note
    #[error("{0}")]
    AmbiguousNoteId(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A route parameter bundle lacked a required key
    #[error("Missing navigation parameter: {0}")]
    MissingParameter(&'static str),

    /// A store request did not complete in time
    #[error("Store request timed out after {0:?}")]
    Timeout(Duration),

    /// Password hashing or hash parsing failed
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
