//! Command-line interface for the flick replay binary.

use clap::Parser;
use flick_commands::Permission;
use std::path::PathBuf;

/// flick: replay a recorded pointer trace through the gesture engine
#[derive(Parser)]
#[command(name = "flick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON-lines pointer trace to replay
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Config file to load (defaults to the platform config path)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Capability to grant to dispatched commands (repeatable)
    #[arg(long = "grant", value_enum, value_name = "PERMISSION")]
    pub grants: Vec<GrantArg>,

    /// Log level
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: log::LevelFilter,
}

/// CLI spelling of the command permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GrantArg {
    Clipboard,
    Navigation,
    Shell,
}

impl From<GrantArg> for Permission {
    fn from(grant: GrantArg) -> Self {
        match grant {
            GrantArg::Clipboard => Permission::Clipboard,
            GrantArg::Navigation => Permission::Navigation,
            GrantArg::Shell => Permission::Shell,
        }
    }
}
