// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::CommandTemplate;
use crate::types::EventKind;

pub const DEFAULT_LOGFILE: &str = "logs/firewatch.log";
pub const DEFAULT_DUMPFILE: &str = "logs/firewatch_subcommands_dump.log";

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// dumpfile = "logs/commands.log"
/// reap_interval_ms = 1000
///
/// [[watch]]
/// path = "/srv/incoming"
/// events = ["CREATED", "MODIFIED"]
/// command = "process %r"
/// ```
///
/// Every key is optional; an empty file is valid (rules can come from the
/// command line).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// File that receives daemon logs (in addition to stderr).
    #[serde(default)]
    pub logfile: Option<PathBuf>,

    /// File that receives command invocations, their output, and exit codes.
    #[serde(default)]
    pub dumpfile: Option<PathBuf>,

    /// If set, running commands are also reaped on this period instead of
    /// only when the next command is spawned.
    #[serde(default)]
    pub reap_interval_ms: Option<u64>,

    /// `[[watch]]` tables, in registration order.
    #[serde(default)]
    pub watch: Vec<RawWatchSpec>,
}

/// `[[watch]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWatchSpec {
    pub path: PathBuf,
    pub events: Vec<EventKind>,
    pub command: String,
}

/// One validated watch rule, ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    pub path: PathBuf,
    /// Deduplicated, first occurrence first. Never empty.
    pub events: Vec<EventKind>,
    pub template: CommandTemplate,
}

/// Daemon-wide settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub logfile: PathBuf,
    pub dumpfile: PathBuf,
    pub reap_interval: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logfile: PathBuf::from(DEFAULT_LOGFILE),
            dumpfile: PathBuf::from(DEFAULT_DUMPFILE),
            reap_interval: None,
        }
    }
}

/// Validated configuration.
///
/// Can only be constructed through `TryFrom<RawConfigFile>` (see
/// `validate.rs`) or [`ConfigFile::from_parts`] after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub settings: Settings,
    pub watches: Vec<WatchSpec>,
}

impl ConfigFile {
    pub(crate) fn from_parts(settings: Settings, watches: Vec<WatchSpec>) -> Self {
        Self { settings, watches }
    }
}
