// src/engine/core.rs

//! Dispatch decision core.
//!
//! [`Dispatcher`] turns one [`Notification`] into a [`Dispatch`]: either the
//! rule/path/event to hand to a spawn backend, or the reason the
//! notification was dropped. It owns the registry and the set of paths the
//! daemon writes itself, and performs no process or channel IO, so it can be
//! unit tested against a mock filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::fs::FileSystem;
use crate::types::EventKind;
use crate::watch::path_utils::{dirname_str, real_path};
use crate::watch::{Notification, WatchEntry, WatchRegistry};

/// Why a notification did not lead to a spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The path is one the daemon writes to (dump file, log file).
    OwnOutput,
    /// No registered directory prefixes the changed file's directory.
    NoMatchingRule,
    /// A rule matched but does not react to this kind of change.
    EventNotWatched,
}

/// Outcome of handling one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<'a> {
    Ignored(IgnoreReason),
    Spawn {
        entry: &'a WatchEntry,
        real_path: PathBuf,
        event: EventKind,
    },
}

#[derive(Debug)]
pub struct Dispatcher {
    registry: WatchRegistry,
    fs: Arc<dyn FileSystem>,
    own_outputs: Vec<PathBuf>,
}

impl Dispatcher {
    /// `own_outputs` are canonical paths of files the daemon itself appends
    /// to; changes to them are never dispatched.
    pub fn new(registry: WatchRegistry, own_outputs: Vec<PathBuf>) -> Self {
        let fs = registry.fs();
        Self {
            registry,
            fs,
            own_outputs,
        }
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    pub fn decide(&self, notification: &Notification) -> Dispatch<'_> {
        let real_path = real_path(self.fs.as_ref(), &notification.path);
        if self.own_outputs.iter().any(|p| *p == real_path) {
            return Dispatch::Ignored(IgnoreReason::OwnOutput);
        }

        let dir = dirname_str(&notification.path);
        let Some(entry) = self.registry.match_dir(&dir) else {
            return Dispatch::Ignored(IgnoreReason::NoMatchingRule);
        };

        let event = EventKind::from(notification.change);
        if !entry.reacts_to(event) {
            debug!(
                path = ?notification.path,
                %event,
                rule = ?entry.canonical_path(),
                "rule does not watch this event"
            );
            return Dispatch::Ignored(IgnoreReason::EventNotWatched);
        }

        Dispatch::Spawn {
            entry,
            real_path,
            event,
        }
    }
}
