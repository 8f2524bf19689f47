//! CLI command implementations.

pub mod check;
pub mod config;
pub mod run;

use clap::{Args, Subcommand};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Input HTML file (default: stdin).
    pub input: Option<String>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Read size in bytes, overriding the config.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Add a rule upgrading `a[href]` links from http: to https:.
    #[arg(long)]
    pub https: bool,

    /// Print byte and chunk counters when done.
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Input HTML file.
    pub input: Option<String>,

    /// Add a rule upgrading `a[href]` links from http: to https:.
    #[arg(long)]
    pub https: bool,

    /// Run the built-in href scheme-upgrade scenario instead of a file.
    #[arg(long)]
    pub builtin: bool,

    /// Refuse inputs larger than this (every split is rewritten).
    #[arg(long, default_value = "65536")]
    pub max_bytes: usize,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
