// src/exec/template.rs

//! Command templates and placeholder substitution.
//!
//! A template is plain text with `%x` placeholders. Rendering walks
//! [`PLACEHOLDERS`] in order and replaces every occurrence of each token with
//! its value, one token at a time. Substitution is therefore order dependent:
//! if a value inserted by an earlier token contains the literal text of a
//! later token, the later pass rewrites it too. For example `%r` with a path
//! of `/tmp/%d/x` renders to `/tmp//tmp/%d/x`. Placeholders not in the table
//! (`%q`, `%%`, ...) are left untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, Timelike};

use crate::types::EventKind;
use crate::watch::path_utils::{dirname_str, filename_str};

/// Everything a placeholder can draw its value from.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub timestamp: DateTime<Local>,
    pub real_path: PathBuf,
    pub event: EventKind,
}

impl RenderContext {
    /// Context stamped with the current local time.
    pub fn now(real_path: impl Into<PathBuf>, event: EventKind) -> Self {
        Self {
            timestamp: Local::now(),
            real_path: real_path.into(),
            event,
        }
    }
}

/// One row of the placeholder table.
pub struct Placeholder {
    pub token: &'static str,
    pub help: &'static str,
    value: fn(&RenderContext) -> String,
}

impl Placeholder {
    pub fn value(&self, ctx: &RenderContext) -> String {
        (self.value)(ctx)
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placeholder")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

fn micros(ctx: &RenderContext) -> u32 {
    // chrono encodes a leap second as nanosecond >= 1e9.
    (ctx.timestamp.nanosecond() % 1_000_000_000) / 1_000
}

/// Substitution table, applied top to bottom.
pub const PLACEHOLDERS: &[Placeholder] = &[
    Placeholder {
        token: "%r",
        help: "real path of the file that triggered the event",
        value: |ctx| ctx.real_path.to_string_lossy().into_owned(),
    },
    Placeholder {
        token: "%d",
        help: "directory containing the file that triggered the event",
        value: |ctx| dirname_str(&ctx.real_path),
    },
    Placeholder {
        token: "%f",
        help: "file name (basename) of the file that triggered the event",
        value: |ctx| filename_str(&ctx.real_path),
    },
    Placeholder {
        token: "%e",
        help: "event name (CREATED | MODIFIED | DELETED)",
        value: |ctx| ctx.event.as_str().to_string(),
    },
    Placeholder {
        token: "%Y",
        help: "year when the event occurred",
        value: |ctx| ctx.timestamp.year().to_string(),
    },
    Placeholder {
        token: "%M",
        help: "month when the event occurred",
        value: |ctx| ctx.timestamp.month().to_string(),
    },
    Placeholder {
        token: "%D",
        help: "day when the event occurred",
        value: |ctx| ctx.timestamp.day().to_string(),
    },
    Placeholder {
        token: "%h",
        help: "hour when the event occurred",
        value: |ctx| ctx.timestamp.hour().to_string(),
    },
    Placeholder {
        token: "%m",
        help: "minute when the event occurred",
        value: |ctx| ctx.timestamp.minute().to_string(),
    },
    Placeholder {
        token: "%s",
        help: "second when the event occurred",
        value: |ctx| ctx.timestamp.second().to_string(),
    },
    Placeholder {
        token: "%u",
        help: "microsecond when the event occurred",
        value: |ctx| micros(ctx).to_string(),
    },
];

/// A shell command pattern with `%x` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    raw: String,
}

impl CommandTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Render the template against `ctx` by sequential literal replacement.
    pub fn render(&self, ctx: &RenderContext) -> String {
        PLACEHOLDERS.iter().fold(self.raw.clone(), |command, ph| {
            if command.contains(ph.token) {
                command.replace(ph.token, &ph.value(ctx))
            } else {
                command
            }
        })
    }

    /// Convenience for rendering against a path/event pair at the current time.
    pub fn render_now(&self, real_path: &Path, event: EventKind) -> String {
        self.render(&RenderContext::now(real_path, event))
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
