use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cloudnote_core::navigation::ScreenKind;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cloudnote")]
#[command(about = "Keep notes in a shared document store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for store configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Overrides for the configured store.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Store backend to use
    #[arg(long = "store", global = true, value_enum, value_name = "KIND")]
    pub kind: Option<StoreKind>,

    /// Path to the local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Seconds to wait for each store request
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Account credentials for note commands.
#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Account username
    #[arg(short, long, env = "CLOUDNOTE_USERNAME")]
    pub username: String,

    /// Account password
    #[arg(short, long, env = "CLOUDNOTE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup {
        /// New username
        username: String,
        /// Password for the new account
        #[arg(long)]
        password: String,
        /// The same password again
        #[arg(long)]
        confirm: String,
    },
    /// Check a username and password
    Login {
        /// Account username
        username: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// List notes
    List {
        #[command(flatten)]
        credentials: Credentials,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        #[command(flatten)]
        credentials: Credentials,
        /// Note title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Note content (read from stdin when omitted)
        content: Vec<String>,
    },
    /// Edit an existing note
    Edit {
        #[command(flatten)]
        credentials: Credentials,
        /// Note ID or unique ID prefix
        id: String,
        /// Replacement title
        #[arg(long)]
        title: Option<String>,
        /// Replacement content
        #[arg(long)]
        content: Option<String>,
        /// Edit the content in $EDITOR
        #[arg(long, conflicts_with = "content")]
        editor: bool,
    },
    /// Delete an existing note
    Delete {
        #[command(flatten)]
        credentials: Credentials,
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Open the interactive screens
    Shell {
        /// Screen to start on
        #[arg(long, value_parser = parse_screen_kind, value_name = "SCREEN")]
        start: Option<ScreenKind>,
        /// Screen parameters such as KEY_USERNAME=alice
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI store profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Local,
    Turso,
    Replica,
    Firestore,
}

impl StoreKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Local => "local",
            Self::Turso => "turso",
            Self::Replica => "replica",
            Self::Firestore => "firestore",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Store backend for this profile
        #[arg(long = "store", value_enum, value_name = "KIND")]
        kind: Option<StoreKind>,
        /// Local database file (local and replica stores)
        #[arg(long, value_name = "PATH")]
        db_path: Option<PathBuf>,
        /// Turso database URL
        #[arg(long, value_name = "URL")]
        turso_url: Option<String>,
        /// Turso auth token
        #[arg(long, value_name = "TOKEN")]
        turso_auth_token: Option<String>,
        /// Firestore project id
        #[arg(long, value_name = "ID")]
        firestore_project: Option<String>,
        /// Firestore web API key
        #[arg(long, value_name = "KEY")]
        firestore_api_key: Option<String>,
        /// Firestore emulator host:port
        #[arg(long, value_name = "HOST")]
        firestore_emulator_host: Option<String>,
        /// Seconds to wait for each store request
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved store configuration
    Show {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}

fn parse_screen_kind(value: &str) -> Result<ScreenKind, String> {
    value.parse::<ScreenKind>().map_err(|error| error.to_string())
}
