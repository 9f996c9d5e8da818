//! Line-oriented front end for the screens.

use std::fmt::Write as _;
use std::io::Write as _;

use cloudnote_core::navigation::{parse_param_pairs, Route, ScreenKind};
use cloudnote_core::screens::Screen;
use cloudnote_core::session::StatusKind;
use cloudnote_core::{Action, App};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Action(Action),
    Help,
    Quit,
}

pub async fn run_shell(
    app: &mut App,
    start: Option<ScreenKind>,
    params: &[String],
) -> Result<(), CliError> {
    match start {
        Some(kind) => {
            let params = parse_param_pairs(params)?;
            app.start_at(Route::from_params(kind, &params)?).await;
        }
        None if !params.is_empty() => {
            return Err(CliError::Config("--param requires --start".to_string()));
        }
        None => {}
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", render_screen(app));

    while app.is_running() {
        print!("{}> ", app.route().kind());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_shell_command(app.route().kind(), &line) {
            Ok(None) => continue,
            Ok(Some(ShellCommand::Help)) => {
                println!("{}", screen_help(app.route().kind()));
                continue;
            }
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(ShellCommand::Action(action))) => {
                if let Err(error) = app.dispatch(action).await {
                    println!("{error}");
                    continue;
                }
            }
            Err(message) => {
                println!("{message}");
                continue;
            }
        }

        if app.is_running() {
            print!("{}", render_screen(app));
        }
    }

    Ok(())
}

/// Parse one shell line for the given screen; blank lines yield `None`.
///
/// Secrets are taken verbatim after the single separator. Other values are
/// trimmed, and `title`/`content` turn a literal `\n` into a line break.
pub fn parse_shell_command(screen: ScreenKind, line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (word, secret) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line.trim_end(), ""));
    let word = word.to_ascii_lowercase();
    let rest = secret.trim();
    let value = rest.to_string();
    let text = rest.replace("\\n", "\n");

    let command = match (screen, word.as_str()) {
        (_, "help" | "?") => ShellCommand::Help,
        (_, "quit" | "exit") => ShellCommand::Quit,
        (_, "back") => ShellCommand::Action(Action::Back),

        (ScreenKind::Login, "username" | "user") => {
            ShellCommand::Action(Action::SetLoginUsername(value))
        }
        (ScreenKind::Login, "password" | "pass") => {
            ShellCommand::Action(Action::SetLoginPassword(secret.to_string()))
        }
        (ScreenKind::Login, "login" | "submit") => ShellCommand::Action(Action::SubmitLogin),
        (ScreenKind::Login, "signup") => ShellCommand::Action(Action::OpenSignup),

        (ScreenKind::Signup, "username" | "user") => {
            ShellCommand::Action(Action::SetNewUsername(value))
        }
        (ScreenKind::Signup, "password" | "pass") => {
            ShellCommand::Action(Action::SetNewPassword(secret.to_string()))
        }
        (ScreenKind::Signup, "confirm") => {
            ShellCommand::Action(Action::SetConfirmPassword(secret.to_string()))
        }
        (ScreenKind::Signup, "signup" | "submit" | "create") => {
            ShellCommand::Action(Action::SubmitSignup)
        }
        (ScreenKind::Signup, "login") => ShellCommand::Action(Action::OpenLogin),

        (ScreenKind::Home, "refresh" | "reload") => ShellCommand::Action(Action::Refresh),
        (ScreenKind::Home, "add" | "new") => ShellCommand::Action(Action::NewNote),
        (ScreenKind::Home, "open") => {
            let target = rest;
            if target.is_empty() {
                return Err("usage: open <number|id>".to_string());
            }
            match target.parse::<usize>() {
                Ok(0) => return Err("note numbers start at 1".to_string()),
                Ok(position) => ShellCommand::Action(Action::OpenNote(position - 1)),
                Err(_) => ShellCommand::Action(Action::OpenNoteById(target.to_string())),
            }
        }

        (ScreenKind::AddNote | ScreenKind::EditNote, "title") => {
            ShellCommand::Action(Action::SetNoteTitle(text))
        }
        (ScreenKind::AddNote | ScreenKind::EditNote, "content") => {
            ShellCommand::Action(Action::SetNoteContent(text))
        }
        (ScreenKind::AddNote | ScreenKind::EditNote, "save") => ShellCommand::Action(Action::Save),
        (ScreenKind::AddNote | ScreenKind::EditNote, "discard") => {
            ShellCommand::Action(Action::Discard)
        }
        (ScreenKind::EditNote, "delete") => ShellCommand::Action(Action::Delete),

        (screen, word) => {
            return Err(format!(
                "unknown command '{word}' on the {screen} screen; type 'help'"
            ))
        }
    };

    Ok(Some(command))
}

pub const fn screen_help(screen: ScreenKind) -> &'static str {
    match screen {
        ScreenKind::Login => {
            "username <name> | password <secret> | login | signup | back (exit) | quit"
        }
        ScreenKind::Signup => {
            "username <name> | password <secret> | confirm <secret> | signup | login | back | quit"
        }
        ScreenKind::Home => "open <number|id> | add | refresh | back (log out) | quit",
        ScreenKind::AddNote => "title <text> | content <text> | save | discard | back | quit",
        ScreenKind::EditNote => {
            "title <text> | content <text> | save | delete | discard | back | quit"
        }
    }
}

/// Text rendering of the current screen and its status line.
pub fn render_screen(app: &App) -> String {
    let session = app.session();
    let mut out = String::new();

    let heading = app.route().username().map_or_else(
        || format!("== {} ==", app.route().kind()),
        |username| format!("== {} ({username}) ==", app.route().kind()),
    );
    let _ = writeln!(out, "{heading}");

    match app.screen() {
        Screen::Login(_) => {
            let _ = writeln!(out, "username: {}", session.login.username);
            let _ = writeln!(out, "password: {}", mask(&session.login.password));
        }
        Screen::Signup(_) => {
            let _ = writeln!(out, "username: {}", session.signup.new_username);
            let _ = writeln!(out, "password: {}", mask(&session.signup.new_password));
            let _ = writeln!(out, "confirm:  {}", mask(&session.signup.confirm_password));
        }
        Screen::Home(home) => {
            if home.notes().is_empty() {
                let _ = writeln!(out, "(no notes)");
            }
            for (position, card) in home.notes().iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", position + 1, card.title);
                let _ = writeln!(out, "     {}", card.content);
            }
        }
        Screen::AddNote(_) | Screen::EditNote(_) => {
            let _ = writeln!(out, "title:   {}", session.note.title);
            let _ = writeln!(out, "content: {}", session.note.content);
        }
    }

    if let Some(status) = app.status() {
        let marker = match status.kind {
            StatusKind::Success => "ok",
            StatusKind::Failure => "!!",
        };
        let _ = writeln!(out, "[{marker}] {}", status.message);
    }
    out
}

fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}
