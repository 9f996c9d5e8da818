//! Login and signup against the users collection.

mod password;

pub use password::{hash_password, is_password_hash, verify_password};

use crate::models::{UserDocument, Username, UsernameError};
use crate::session::Status;
use crate::store::DocumentStore;
use crate::{Error, Result};

pub const LOGIN_SUCCESS: &str = "Login successful.";
pub const INVALID_PASSWORD: &str = "Invalid password!";
pub const USERNAME_NOT_FOUND: &str = "Username not found!";
pub const SIGNUP_SUCCESS: &str = "Account successfully created.";
pub const USERNAME_EXISTS: &str = "That username already exists!";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match!";

/// Result of a login attempt that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(Username),
    UsernameNotFound,
    InvalidPassword,
    InvalidUsername(UsernameError),
}

impl LoginOutcome {
    /// Status line shown on the login screen
    pub fn status(&self) -> Status {
        match self {
            Self::Success(_) => Status::success(LOGIN_SUCCESS),
            Self::UsernameNotFound => Status::failure(USERNAME_NOT_FOUND),
            Self::InvalidPassword => Status::failure(INVALID_PASSWORD),
            Self::InvalidUsername(error) => Status::failure(error.to_string()),
        }
    }
}

/// Result of a signup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Created(Username),
    UsernameExists,
    PasswordsDoNotMatch,
    InvalidUsername(UsernameError),
}

impl SignupOutcome {
    /// Status line shown on the signup screen
    pub fn status(&self) -> Status {
        match self {
            Self::Created(_) => Status::success(SIGNUP_SUCCESS),
            Self::UsernameExists => Status::failure(USERNAME_EXISTS),
            Self::PasswordsDoNotMatch => Status::failure(PASSWORDS_DO_NOT_MATCH),
            Self::InvalidUsername(error) => Status::failure(error.to_string()),
        }
    }
}

/// Check `password` against the stored user document for `username`.
pub async fn login(
    store: &dyn DocumentStore,
    username: &str,
    password: &str,
) -> Result<LoginOutcome> {
    let username = match Username::parse(username) {
        Ok(username) => username,
        Err(error) => return Ok(LoginOutcome::InvalidUsername(error)),
    };

    let Some(document) = store.get_user(&username).await? else {
        tracing::debug!("Login rejected: no user document for {username}");
        return Ok(LoginOutcome::UsernameNotFound);
    };

    let Some(stored) = document.password else {
        tracing::warn!("Login rejected: user document for {username} has no password");
        return Ok(LoginOutcome::InvalidPassword);
    };
    let password = password.to_string();
    let verified = run_blocking(move || verify_password(&password, &stored)).await?;
    if verified {
        tracing::info!("User {username} logged in");
        Ok(LoginOutcome::Success(username))
    } else {
        tracing::debug!("Login rejected: wrong password for {username}");
        Ok(LoginOutcome::InvalidPassword)
    }
}

/// Create a user document for `new_username`.
///
/// An existing username wins over a password mismatch. Nothing is written
/// unless the username is free and both passwords match.
pub async fn signup(
    store: &dyn DocumentStore,
    new_username: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<SignupOutcome> {
    let username = match Username::parse(new_username) {
        Ok(username) => username,
        Err(error) => return Ok(SignupOutcome::InvalidUsername(error)),
    };

    if store.get_user(&username).await?.is_some() {
        return Ok(SignupOutcome::UsernameExists);
    }
    if confirm_password != new_password {
        return Ok(SignupOutcome::PasswordsDoNotMatch);
    }

    let password = new_password.to_string();
    let hash = run_blocking(move || hash_password(&password)).await??;
    if !store
        .create_user(&username, &UserDocument::new(hash))
        .await?
    {
        // Taken between the point read and the create.
        tracing::debug!("Signup lost a race for {username}");
        return Ok(SignupOutcome::UsernameExists);
    }

    tracing::info!("Created account {username}");
    Ok(SignupOutcome::Created(username))
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| Error::PasswordHash(format!("hashing task failed: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn alice() -> Username {
        Username::parse("alice").unwrap()
    }

    #[tokio::test]
    async fn signup_then_login_succeeds() {
        let store = MemoryStore::new();

        let outcome = signup(&store, "alice", "pw1", "pw1").await.unwrap();
        assert_eq!(outcome, SignupOutcome::Created(alice()));

        let outcome = login(&store, "alice", "pw1").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Success(alice()));
    }

    #[tokio::test]
    async fn signup_stores_a_hash_not_the_password() {
        let store = MemoryStore::new();
        signup(&store, "alice", "pw1", "pw1").await.unwrap();

        let stored = store.get_user(&alice()).await.unwrap().unwrap();
        assert_ne!(stored.password(), Some("pw1"));
        assert!(stored.password().is_some_and(is_password_hash));
    }

    #[tokio::test]
    async fn signup_existing_username_fails_regardless_of_passwords() {
        let store = MemoryStore::new();
        signup(&store, "alice", "pw1", "pw1").await.unwrap();

        for (new, confirm) in [("pw1", "pw1"), ("x", "y"), ("", "")] {
            let outcome = signup(&store, "alice", new, confirm).await.unwrap();
            assert_eq!(outcome, SignupOutcome::UsernameExists);
            assert_eq!(outcome.status().message, USERNAME_EXISTS);
        }
    }

    #[tokio::test]
    async fn signup_mismatched_passwords_writes_nothing() {
        let store = MemoryStore::new();
        let outcome = signup(&store, "alice", "pw1", "pw2").await.unwrap();
        assert_eq!(outcome, SignupOutcome::PasswordsDoNotMatch);
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn login_reports_unknown_user_and_wrong_password() {
        let store = MemoryStore::new();
        assert_eq!(
            login(&store, "ghost", "pw").await.unwrap(),
            LoginOutcome::UsernameNotFound
        );

        signup(&store, "alice", "pw1", "pw1").await.unwrap();
        let outcome = login(&store, "alice", "nope").await.unwrap();
        assert_eq!(outcome, LoginOutcome::InvalidPassword);
        assert_eq!(outcome.status().message, INVALID_PASSWORD);
    }

    #[tokio::test]
    async fn login_without_stored_password_is_invalid_password() {
        let store = MemoryStore::new();
        store
            .create_user(&alice(), &UserDocument::without_password())
            .await
            .unwrap();

        for attempt in ["", "pw1"] {
            let outcome = login(&store, "alice", attempt).await.unwrap();
            assert_eq!(outcome, LoginOutcome::InvalidPassword);
        }
    }

    #[tokio::test]
    async fn login_with_hash_like_plaintext_is_a_login_result() {
        let store = MemoryStore::new();
        store
            .create_user(&alice(), &UserDocument::new("$argon2-is-my-password"))
            .await
            .unwrap();

        assert_eq!(
            login(&store, "alice", "wrong").await.unwrap(),
            LoginOutcome::InvalidPassword
        );
        assert_eq!(
            login(&store, "alice", "$argon2-is-my-password").await.unwrap(),
            LoginOutcome::Success(alice())
        );
    }

    #[tokio::test]
    async fn login_accepts_legacy_plaintext_documents() {
        let store = MemoryStore::new();
        store
            .create_user(&alice(), &UserDocument::new("pw1"))
            .await
            .unwrap();

        assert_eq!(
            login(&store, "alice", "pw1").await.unwrap(),
            LoginOutcome::Success(alice())
        );
    }

    #[tokio::test]
    async fn blank_username_is_rejected_without_store_access() {
        let store = MemoryStore::new();
        let outcome = signup(&store, "  ", "pw", "pw").await.unwrap();
        assert_eq!(outcome, SignupOutcome::InvalidUsername(UsernameError::Empty));
        assert_eq!(outcome.status().message, "Username cannot be empty!");
        assert_eq!(store.user_count().await, 0);
    }
}
