// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `confcheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "confcheck",
    version,
    about = "Audit the actor service config before it is allowed to start.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (INI, or TOML when it ends in `.toml`).
    ///
    /// Default: `$CONFCHECK_CONF`, else `service.conf` in the current
    /// working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report every violation instead of stopping at the first one.
    #[arg(long)]
    pub all: bool,

    /// Print the audit rules in evaluation order and exit without reading
    /// any config.
    #[arg(long, conflicts_with = "all")]
    pub list_rules: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CONFCHECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
