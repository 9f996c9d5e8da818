//! User model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest accepted username, in characters
pub const MAX_USERNAME_CHARS: usize = 128;

/// A username, which doubles as the user's document key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

/// Reasons a username cannot be used as a document key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Username cannot be empty!")]
    Empty,
    #[error("Username cannot contain '/'!")]
    ContainsSlash,
    #[error("Username is too long!")]
    TooLong,
    #[error("Username is reserved!")]
    Reserved,
}

impl Username {
    /// Validate and normalize a username.
    ///
    /// Surrounding whitespace is trimmed. The result must be non-empty, at
    /// most [`MAX_USERNAME_CHARS`] characters, and free of `/` since it is
    /// used as a path segment. `.`, `..` and `__name__` ids are reserved:
    /// URL parsers collapse the first two and document stores keep the last.
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }
        if trimmed.contains('/') {
            return Err(UsernameError::ContainsSlash);
        }
        if trimmed.chars().count() > MAX_USERNAME_CHARS {
            return Err(UsernameError::TooLong);
        }
        if is_reserved_id(trimmed) {
            return Err(UsernameError::Reserved);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_reserved_id(id: &str) -> bool {
    matches!(id, "." | "..") || (id.len() > 4 && id.starts_with("__") && id.ends_with("__"))
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// The stored fields of a user document: `{password}`.
///
/// `password` holds an Argon2id PHC string for accounts created by this
/// client. Accounts written by the legacy client hold the plaintext value.
/// A document without a string `password` field matches no password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub password: Option<String>,
}

impl UserDocument {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }

    pub const fn without_password() -> Self {
        Self { password: None }
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for UserDocument {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UserDocument")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let username = Username::parse("  alice ").unwrap();
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn parse_rejects_invalid_keys() {
        assert_eq!(Username::parse("   "), Err(UsernameError::Empty));
        assert_eq!(Username::parse("a/b"), Err(UsernameError::ContainsSlash));
        let long = "x".repeat(MAX_USERNAME_CHARS + 1);
        assert_eq!(Username::parse(&long), Err(UsernameError::TooLong));
    }

    #[test]
    fn parse_rejects_reserved_path_segments() {
        for raw in [".", "..", " .. ", "__name__", "__.*__"] {
            assert_eq!(Username::parse(raw), Err(UsernameError::Reserved), "{raw:?}");
        }
        for raw in ["a.b", "...", "__", "____", "__alice", "alice__"] {
            assert!(Username::parse(raw).is_ok(), "{raw:?}");
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: Username = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(ok.as_str(), "bob");
        assert!(serde_json::from_str::<Username>("\"\"").is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let doc = UserDocument::new("hunter2");
        let rendered = format!("{doc:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }
}
