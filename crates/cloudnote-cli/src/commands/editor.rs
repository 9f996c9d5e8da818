//! External editor for note bodies

use std::env;
use std::io::Write;
use std::process::Command;

use crate::error::CliError;

#[cfg(windows)]
const FALLBACK_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const FALLBACK_EDITOR: &str = "vi";

/// An editor command line, such as `code --wait`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// Split a command line into program and arguments.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// `$VISUAL`, then `$EDITOR`, then the platform default.
    pub fn from_env() -> Self {
        ["VISUAL", "EDITOR"]
            .into_iter()
            .filter_map(|key| env::var(key).ok())
            .find_map(|command| Self::parse(&command))
            .unwrap_or_else(|| Self {
                program: FALLBACK_EDITOR.to_string(),
                args: Vec::new(),
            })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Open `initial` in the editor and return what was saved, without the
    /// trailing newlines editors append.
    pub fn edit(&self, initial: &str) -> Result<String, CliError> {
        let mut file = tempfile::Builder::new()
            .prefix("cloudnote-")
            .suffix(".md")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        tracing::debug!("Launching editor `{}`", self.program);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .status()
            .map_err(|error| {
                CliError::EditorFailed(format!("could not start `{}`: {error}", self.program))
            })?;
        if !status.success() {
            return Err(CliError::EditorFailed(format!(
                "`{}` exited with status {status}",
                self.program
            )));
        }

        let edited = std::fs::read_to_string(file.path())?;
        Ok(edited.trim_end_matches(['\n', '\r']).to_string())
    }
}
