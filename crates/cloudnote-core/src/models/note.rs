//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Displayed in place of a blank note title.
pub const NO_TITLE_PLACEHOLDER: &str = "<No Title>";

/// Displayed in place of blank note content.
pub const NO_CONTENT_PLACEHOLDER: &str = "<No Content>";

/// Store-assigned note identifier.
///
/// Opaque to the client: Firestore hands out 20-character keys, the local
/// backends hand out UUID v7 strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap an identifier returned by a store.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh time-sortable id for backends that assign ids locally
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The stored fields of a note document: `{title, content}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
}

impl NoteFields {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A note document as returned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier
    pub id: NoteId,
    /// Raw title as stored
    pub title: String,
    /// Raw content as stored
    pub content: String,
}

impl Note {
    pub fn new(id: NoteId, fields: NoteFields) -> Self {
        Self {
            id,
            title: fields.title,
            content: fields.content,
        }
    }

    #[must_use]
    pub fn fields(&self) -> NoteFields {
        NoteFields::new(self.title.clone(), self.content.clone())
    }

    /// Title as shown on the home list
    #[must_use]
    pub fn display_title(&self) -> String {
        display_text(&self.title, NO_TITLE_PLACEHOLDER)
    }

    /// Content as shown on the home list
    #[must_use]
    pub fn display_content(&self) -> String {
        display_text(&self.content, NO_CONTENT_PLACEHOLDER)
    }
}

/// A note prepared for rendering on the home screen.
///
/// Keeps the stored note next to its display strings so that opening the
/// editor starts from the stored text rather than from a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCard {
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub note: Note,
}

impl NoteCard {
    #[must_use]
    pub fn id(&self) -> &NoteId {
        &self.note.id
    }
}

impl From<Note> for NoteCard {
    fn from(note: Note) -> Self {
        Self {
            title: note.display_title(),
            content: note.display_content(),
            note,
        }
    }
}

/// Trim `raw` and substitute `placeholder` when nothing is left.
///
/// # Examples
///
/// ```
/// use cloudnote_core::models::{display_text, NO_TITLE_PLACEHOLDER};
///
/// assert_eq!(display_text("  Groceries ", NO_TITLE_PLACEHOLDER), "Groceries");
/// assert_eq!(display_text(" \t\n", NO_TITLE_PLACEHOLDER), "<No Title>");
/// ```
#[must_use]
pub fn display_text(raw: &str, placeholder: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}
