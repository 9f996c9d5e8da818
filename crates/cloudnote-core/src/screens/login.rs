use super::Transition;
use crate::auth::{self, LoginOutcome};
use crate::navigation::Route;
use crate::session::Session;
use crate::store::DocumentStore;
use crate::Result;

/// Login screen; its inputs live in `Session::login`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginScreen;

impl LoginScreen {
    /// Check the typed credentials and move to Home on success.
    pub async fn submit(&self, store: &dyn DocumentStore, session: &mut Session) -> Result<Transition> {
        let outcome = auth::login(store, &session.login.username, &session.login.password).await?;
        session.set_status(outcome.status());

        match outcome {
            LoginOutcome::Success(username) => {
                session.sign_in(username.clone());
                Ok(Transition::Navigate(Route::Home { username }))
            }
            _ => Ok(Transition::Stay),
        }
    }

    pub const fn open_signup(&self) -> Transition {
        Transition::Navigate(Route::Signup)
    }
}
