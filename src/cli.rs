// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `firewatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "firewatch",
    version,
    about = "Run shell commands when files are created, modified or deleted in watched directories.",
    long_about = None
)]
pub struct CliArgs {
    /// Watch rules: "<dirpath>,[<EVENT>, ...],<command>".
    ///
    /// Events are CREATED, MODIFIED and DELETED. Example:
    /// "/tmp,[CREATED,MODIFIED],echo newfile at %r"
    #[arg(value_name = "WATCH")]
    pub watches: Vec<String>,

    /// TOML file with `[[watch]]` rules and settings.
    ///
    /// Rules given on the command line are registered after the file's rules.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File the daemon logs its activity to (default: logs/firewatch.log).
    #[arg(short, long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// File executed commands and their output are appended to
    /// (default: logs/firewatch_subcommands_dump.log).
    #[arg(short, long, value_name = "PATH")]
    pub dumpfile: Option<PathBuf>,

    /// Also reap finished commands every N milliseconds.
    ///
    /// Without this, finished commands are only collected when the next
    /// command is spawned.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub reap_interval_ms: Option<u64>,

    /// Turn on debug logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over --verbose. If neither is given, `FIREWATCH_LOG`
    /// or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the rules, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the supported command placeholders and exit.
    #[arg(long)]
    pub placeholders: bool,
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

impl CliArgs {
    /// Level requested on the command line, if any.
    pub fn requested_log_level(&self) -> Option<LogLevel> {
        self.log_level
            .or(if self.verbose { Some(LogLevel::Debug) } else { None })
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
