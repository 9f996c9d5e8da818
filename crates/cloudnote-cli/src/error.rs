use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] cloudnote_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Nothing to change: pass --title, --content or --editor")]
    NothingToEdit,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    /// A screen answered with a failure status
    #[error("{0}")]
    Rejected(String),
}
