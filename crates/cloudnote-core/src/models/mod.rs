//! Data models for Cloud Note

mod note;
mod user;

pub use note::{
    display_text, Note, NoteCard, NoteFields, NoteId, NO_CONTENT_PLACEHOLDER, NO_TITLE_PLACEHOLDER,
};
pub use user::{UserDocument, Username, UsernameError, MAX_USERNAME_CHARS};
