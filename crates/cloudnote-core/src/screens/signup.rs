use super::Transition;
use crate::auth::{self, SignupOutcome};
use crate::navigation::Route;
use crate::session::Session;
use crate::store::DocumentStore;
use crate::Result;

/// Signup screen; its inputs live in `Session::signup`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupScreen;

impl SignupScreen {
    /// Create the account and move to Home once the store confirmed it.
    pub async fn submit(&self, store: &dyn DocumentStore, session: &mut Session) -> Result<Transition> {
        let form = &session.signup;
        let outcome = auth::signup(
            store,
            &form.new_username,
            &form.new_password,
            &form.confirm_password,
        )
        .await?;
        session.set_status(outcome.status());

        match outcome {
            SignupOutcome::Created(username) => {
                session.sign_in(username.clone());
                Ok(Transition::Navigate(Route::Home { username }))
            }
            _ => Ok(Transition::Stay),
        }
    }

    pub const fn open_login(&self) -> Transition {
        Transition::Navigate(Route::Login)
    }
}
