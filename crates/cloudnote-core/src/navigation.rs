//! Screen routes and the rules for moving between them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Note, NoteFields, NoteId, Username};
use crate::{Error, Result};

pub const KEY_USERNAME: &str = "KEY_USERNAME";
pub const KEY_NOTE_ID: &str = "KEY_NOTE_ID";
pub const KEY_NOTE_TITLE: &str = "KEY_NOTE_TITLE";
pub const KEY_NOTE_CONTENT: &str = "KEY_NOTE_CONTENT";

/// String parameters carried across a transition
pub type RouteParams = BTreeMap<String, String>;

/// The five screens, without their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenKind {
    Login,
    Signup,
    Home,
    AddNote,
    EditNote,
}

impl ScreenKind {
    pub const ALL: [Self; 5] = [
        Self::Login,
        Self::Signup,
        Self::Home,
        Self::AddNote,
        Self::EditNote,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Home => "home",
            Self::AddNote => "add-note",
            Self::EditNote => "edit-note",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("unknown screen '{s}'")))
    }
}

/// A screen together with the parameters it was entered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Home { username: Username },
    AddNote { username: Username },
    EditNote { username: Username, note: Note },
}

impl Route {
    pub const fn kind(&self) -> ScreenKind {
        match self {
            Self::Login => ScreenKind::Login,
            Self::Signup => ScreenKind::Signup,
            Self::Home { .. } => ScreenKind::Home,
            Self::AddNote { .. } => ScreenKind::AddNote,
            Self::EditNote { .. } => ScreenKind::EditNote,
        }
    }

    /// User the route is scoped to, if any
    pub const fn username(&self) -> Option<&Username> {
        match self {
            Self::Login | Self::Signup => None,
            Self::Home { username }
            | Self::AddNote { username }
            | Self::EditNote { username, .. } => Some(username),
        }
    }

    /// Where the back action leads; `None` means leave the app.
    pub fn back(&self) -> Option<Self> {
        match self {
            Self::Login => None,
            Self::Signup | Self::Home { .. } => Some(Self::Login),
            Self::AddNote { username } | Self::EditNote { username, .. } => Some(Self::Home {
                username: username.clone(),
            }),
        }
    }

    /// Flatten the route's parameters into a string bundle.
    pub fn to_params(&self) -> RouteParams {
        let mut params = RouteParams::new();
        if let Some(username) = self.username() {
            params.insert(KEY_USERNAME.to_string(), username.to_string());
        }
        if let Self::EditNote { note, .. } = self {
            params.insert(KEY_NOTE_ID.to_string(), note.id.to_string());
            params.insert(KEY_NOTE_TITLE.to_string(), note.title.clone());
            params.insert(KEY_NOTE_CONTENT.to_string(), note.content.clone());
        }
        params
    }

    /// Rebuild a route from a parameter bundle.
    ///
    /// Fails with [`Error::MissingParameter`] when a key the screen needs is
    /// absent. Extra keys are ignored.
    pub fn from_params(kind: ScreenKind, params: &RouteParams) -> Result<Self> {
        match kind {
            ScreenKind::Login => Ok(Self::Login),
            ScreenKind::Signup => Ok(Self::Signup),
            ScreenKind::Home => Ok(Self::Home {
                username: username_param(params)?,
            }),
            ScreenKind::AddNote => Ok(Self::AddNote {
                username: username_param(params)?,
            }),
            ScreenKind::EditNote => {
                let username = username_param(params)?;
                let id = NoteId::new(required(params, KEY_NOTE_ID)?);
                let title = required(params, KEY_NOTE_TITLE)?.to_string();
                let content = required(params, KEY_NOTE_CONTENT)?.to_string();
                Ok(Self::EditNote {
                    username,
                    note: Note::new(id, NoteFields::new(title, content)),
                })
            }
        }
    }
}

fn required<'a>(params: &'a RouteParams, key: &'static str) -> Result<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or(Error::MissingParameter(key))
}

fn username_param(params: &RouteParams) -> Result<Username> {
    let raw = required(params, KEY_USERNAME)?;
    Username::parse(raw)
        .map_err(|error| Error::InvalidInput(format!("{KEY_USERNAME}: {error}")))
}

/// Parse `KEY=VALUE` pairs into a parameter bundle.
pub fn parse_param_pairs<I, S>(pairs: I) -> Result<RouteParams>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut params = RouteParams::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::InvalidInput(format!("expected KEY=VALUE, got '{pair}'"))
        })?;
        params.insert(key.trim().to_string(), value.to_string());
    }
    Ok(params)
}
