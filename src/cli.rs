// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `ffchat`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "ffchat",
    version,
    about = "Type into a floating overlay and deliver the text to another window.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `FFChat.toml` in the current working directory; built-in
    /// defaults are used when that file does not exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FFCHAT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate the config, print it, but don't touch any window.
    #[arg(long)]
    pub dry_run: bool,

    /// Target window title; replaces `[target]` from the config.
    #[arg(long, value_name = "TITLE")]
    pub target_name: Option<String>,

    /// Target WM class; replaces `[target]` from the config.
    #[arg(long, value_name = "CLASS")]
    pub target_class: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
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
