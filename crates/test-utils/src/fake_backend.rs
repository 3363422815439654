use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use firewatch::errors::{FirewatchError, Result};
use firewatch::exec::SpawnBackend;
use firewatch::types::EventKind;
use firewatch::watch::WatchEntry;

/// One call the dispatch loop made into the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRecord {
    pub rule: PathBuf,
    pub real_path: PathBuf,
    pub event: EventKind,
    /// The command as it would have been run.
    pub command: String,
}

/// A fake backend that:
/// - records every spawn request with its rendered command
/// - hands out increasing fake pids
/// - counts reap passes and shutdowns
/// - can be told to fail the next spawn the way an unlaunchable command does
///
/// No process is ever started.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    pub spawned: Arc<Mutex<Vec<SpawnRecord>>>,
    pub reaps: Arc<Mutex<usize>>,
    pub shutdowns: Arc<Mutex<usize>>,
    fail_next: Arc<Mutex<bool>>,
    next_pid: u32,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            next_pid: 1000,
            ..Self::default()
        }
    }

    pub fn spawned(&self) -> Vec<SpawnRecord> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn reap_count(&self) -> usize {
        *self.reaps.lock().unwrap()
    }

    pub fn shutdown_count(&self) -> usize {
        *self.shutdowns.lock().unwrap()
    }

    /// Make the next `spawn` return `FirewatchError::Spawn` without recording.
    pub fn fail_next_spawn(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

impl SpawnBackend for FakeBackend {
    fn spawn(&mut self, entry: &WatchEntry, real_path: &Path, event: EventKind) -> Result<u32> {
        let command = entry.template().render_now(real_path, event);
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(FirewatchError::Spawn {
                command,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "sh: not found"),
            });
        }
        self.spawned.lock().unwrap().push(SpawnRecord {
            rule: entry.canonical_path().to_path_buf(),
            real_path: real_path.to_path_buf(),
            event,
            command,
        });
        self.next_pid += 1;
        Ok(self.next_pid)
    }

    fn reap(&mut self) {
        *self.reaps.lock().unwrap() += 1;
    }

    fn shutdown(&mut self) {
        *self.shutdowns.lock().unwrap() += 1;
        self.reap();
    }
}
