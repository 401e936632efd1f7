//! Command-line argument definitions for dockenv.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface for dockenv.
#[derive(Debug, Parser)]
#[command(name = "dockenv")]
#[command(
    author,
    version,
    about = "Build container engine clients from the Docker environment variables"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine endpoint, overriding `DOCKER_HOST`.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Request timeout in seconds, overriding `DOCKER_CLIENT_TIMEOUT`.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Engine API version (`major.minor`), overriding `DOCKER_API_VERSION`.
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Print the resolved client settings.
    Show,

    /// Build the client and check the engine answers.
    Ping,
}
