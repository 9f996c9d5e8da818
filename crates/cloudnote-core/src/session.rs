//! Per-client session and view state.
//!
//! One [`Session`] is owned by the app controller and lent to each screen
//! handler. It is a scratch pad for the running client; nothing in it is
//! persisted.

use serde::Serialize;

use crate::models::Username;

/// Whether the last operation went well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Failure,
}

/// Outcome message shown on the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Failure,
            message: message.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.kind, StatusKind::Success)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub new_username: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Title and content inputs of the add/edit screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}

/// Session state for one running client.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Signed-in user, set after a successful login or signup
    pub username: Option<Username>,
    pub login: LoginForm,
    pub signup: SignupForm,
    pub note: NoteForm,
    /// Status of the last operation on the current screen
    pub status: Option<Status>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signed-in user and forget the credentials typed to get there.
    pub fn sign_in(&mut self, username: Username) {
        self.username = Some(username);
        self.login = LoginForm::default();
        self.signup = SignupForm::default();
    }

    /// Forget the signed-in user and any unsaved note input
    pub fn sign_out(&mut self) {
        self.username = None;
        self.note = NoteForm::default();
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
