use cloudnote_core::{Action, App};

use crate::commands::common::finish_with_status;
use crate::error::CliError;

pub async fn run_signup(
    app: &mut App,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), CliError> {
    app.dispatch(Action::OpenSignup).await?;
    app.dispatch(Action::SetNewUsername(username.to_string()))
        .await?;
    app.dispatch(Action::SetNewPassword(password.to_string()))
        .await?;
    app.dispatch(Action::SetConfirmPassword(confirm.to_string()))
        .await?;
    app.dispatch(Action::SubmitSignup).await?;
    finish_with_status(app)
}

pub async fn run_login(app: &mut App, username: &str, password: &str) -> Result<(), CliError> {
    app.dispatch(Action::SetLoginUsername(username.to_string()))
        .await?;
    app.dispatch(Action::SetLoginPassword(password.to_string()))
        .await?;
    app.dispatch(Action::SubmitLogin).await?;
    finish_with_status(app)
}
