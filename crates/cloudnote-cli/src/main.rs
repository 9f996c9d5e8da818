//! Cloud Note CLI - notes in a shared document store, from the terminal
//!
//! One-shot commands for account and note operations, plus an interactive
//! shell that walks the same screens as the app.

mod cli;
mod commands;
mod config_profiles;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::{run_login, run_signup};
use crate::commands::common::connect;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, NoteEdit};
use crate::commands::list::run_list;
use crate::commands::shell::run_shell;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cloudnote=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Signup {
            username,
            password,
            confirm,
        } => {
            let mut app = connect(profile, &cli.store).await?;
            run_signup(&mut app, &username, &password, &confirm).await?;
        }
        Commands::Login { username, password } => {
            let mut app = connect(profile, &cli.store).await?;
            run_login(&mut app, &username, &password).await?;
        }
        Commands::List { credentials, json } => {
            let mut app = connect(profile, &cli.store).await?;
            run_list(&mut app, &credentials, json).await?;
        }
        Commands::Add {
            credentials,
            title,
            content,
        } => {
            let mut app = connect(profile, &cli.store).await?;
            run_add(&mut app, &credentials, &title, &content).await?;
        }
        Commands::Edit {
            credentials,
            id,
            title,
            content,
            editor,
        } => {
            let mut app = connect(profile, &cli.store).await?;
            let edit = NoteEdit {
                title,
                content,
                use_editor: editor,
            };
            run_edit(&mut app, &credentials, &id, edit).await?;
        }
        Commands::Delete { credentials, id } => {
            let mut app = connect(profile, &cli.store).await?;
            run_delete(&mut app, &credentials, &id).await?;
        }
        Commands::Shell { start, params } => {
            let mut app = connect(profile, &cli.store).await?;
            run_shell(&mut app, start, &params).await?;
        }
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
        Commands::Config { command } => run_config(command, profile, &cli.store)?,
    }

    Ok(())
}
