// src/exec/backend.rs

//! Pluggable spawn backend abstraction.
//!
//! The dispatch loop talks to a `SpawnBackend` instead of a concrete
//! supervisor. Production code uses [`ProcessSupervisor`]; tests can provide
//! a backend that records what would have been spawned without starting any
//! processes.
//!
//! [`ProcessSupervisor`]: super::supervisor::ProcessSupervisor

use std::path::Path;

use crate::errors::Result;
use crate::types::EventKind;
use crate::watch::registry::WatchEntry;

/// How a matched notification is turned into a running command.
pub trait SpawnBackend: Send {
    /// Render `entry`'s command for `real_path`/`event`, launch it, and
    /// return the child's pid.
    ///
    /// Implementations are expected to reap finished children as part of the
    /// same call. An error here means the command could not be launched.
    fn spawn(&mut self, entry: &WatchEntry, real_path: &Path, event: EventKind) -> Result<u32>;

    /// Collect any children that have exited since the last pass.
    fn reap(&mut self);

    /// Called once when the dispatch loop exits.
    fn shutdown(&mut self) {
        self.reap();
    }
}
