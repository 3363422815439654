// src/exec/supervisor.rs

//! Child process supervision.
//!
//! Each matched event starts one shell process whose stdout/stderr are
//! appended to the dump file. The dispatch loop never waits on a child:
//! every spawn hands the child to a small waiter task that awaits its exit,
//! writes the `finished` dump line right away, and reports the exit code
//! back over a oneshot channel.
//!
//! The live set is only swept when the supervisor reaps (after every spawn,
//! and on an optional periodic tick). A child that has exited stays in the
//! live set until the next sweep, even though its dump line is already
//! written.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use chrono::{DateTime, Local};
use tokio::process::{Child, Command};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use crate::errors::{FirewatchError, Result};
use crate::exec::backend::SpawnBackend;
use crate::exec::dump::DumpFile;
use crate::exec::template::RenderContext;
use crate::types::EventKind;
use crate::watch::registry::WatchEntry;

/// Exit code as a shell would report it; a signal-killed process reports the
/// negated signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

/// What a waiter task reports once the child is gone.
pub type ExitReport = io::Result<i32>;

/// A spawned process whose exit has not been observed by a reap pass yet.
#[derive(Debug)]
pub struct ChildHandle {
    pub pid: u32,
    pub spawned_at: DateTime<Local>,
    pub command: String,
    exit_rx: oneshot::Receiver<ExitReport>,
    wait_failed: bool,
}

impl ChildHandle {
    pub fn new(
        pid: u32,
        spawned_at: DateTime<Local>,
        command: impl Into<String>,
        exit_rx: oneshot::Receiver<ExitReport>,
    ) -> Self {
        Self {
            pid,
            spawned_at,
            command: command.into(),
            exit_rx,
            wait_failed: false,
        }
    }

    /// Non-blocking check. Returns whether the handle should stay tracked.
    fn poll(&mut self) -> bool {
        let pid = self.pid;
        match self.exit_rx.try_recv() {
            Ok(Ok(code)) => {
                info!(pid, exit_code = code, command = %self.command, "process finished");
                false
            }
            Ok(Err(err)) => {
                error!(pid, error = %err, "failed to wait on child process");
                self.wait_failed = true;
                true
            }
            Err(TryRecvError::Empty) => {
                debug!(pid, "process still running");
                true
            }
            Err(TryRecvError::Closed) => {
                if !self.wait_failed {
                    warn!(pid, "exit of child process could not be observed");
                    self.wait_failed = true;
                }
                true
            }
        }
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Await `child` on the runtime, write its `finished` line, and report the
/// exit code.
fn watch_exit(
    mut child: Child,
    dump: DumpFile,
    pid: u32,
    spawned_at: DateTime<Local>,
    command: String,
) -> oneshot::Receiver<ExitReport> {
    let (exit_tx, exit_rx) = oneshot::channel();

    tokio::spawn(async move {
        let report = child.wait().await.map(exit_code);
        if let Ok(code) = &report {
            if let Err(err) = dump.write_finished(&spawned_at, &command, *code) {
                warn!(pid, error = %err, "failed to write finish line to dump file");
            }
        }
        // The supervisor may already be gone on shutdown.
        let _ = exit_tx.send(report);
    });

    exit_rx
}

#[derive(Debug)]
pub struct ProcessSupervisor {
    dump: DumpFile,
    live: BTreeMap<u32, ChildHandle>,
}

impl ProcessSupervisor {
    pub fn new(dump: DumpFile) -> Self {
        Self {
            dump,
            live: BTreeMap::new(),
        }
    }

    pub fn dump_path(&self) -> &Path {
        self.dump.path()
    }

    /// Pids spawned but not yet observed to exit, in ascending order.
    pub fn live_pids(&self) -> Vec<u32> {
        self.live.keys().copied().collect()
    }

    /// Start tracking an already-running child.
    pub fn track(&mut self, handle: ChildHandle) {
        self.live.insert(handle.pid, handle);
    }

    /// Render and launch the command for one dispatched event.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_command(
        &mut self,
        entry: &WatchEntry,
        real_path: &Path,
        event: EventKind,
    ) -> Result<u32> {
        let ctx = RenderContext::now(real_path, event);
        let command = entry.template().render(&ctx);

        self.dump.write_started(&ctx.timestamp, &command)?;

        let mut cmd = shell_command(&command);
        cmd.stdin(Stdio::null())
            .stdout(self.dump.child_stdio()?)
            .stderr(self.dump.child_stdio()?)
            .kill_on_drop(false);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                if let Err(err) = self.dump.write_spawn_failed(&ctx.timestamp, &command, &source) {
                    warn!(error = %err, "failed to write spawn failure to dump file");
                }
                return Err(FirewatchError::Spawn { command, source });
            }
        };

        let Some(pid) = child.id() else {
            return Err(FirewatchError::Spawn {
                command,
                source: io::Error::other("child exited before its pid could be read"),
            });
        };

        info!(pid, %command, event = %event, path = ?real_path, "executing command");

        let exit_rx = watch_exit(child, self.dump.clone(), pid, ctx.timestamp, command.clone());
        self.track(ChildHandle::new(pid, ctx.timestamp, command, exit_rx));
        self.reap_children();

        Ok(pid)
    }

    /// Sweep the live set once without blocking.
    ///
    /// Children whose exit has been reported are dropped. A child whose wait
    /// failed is logged and kept; it is never retried by its waiter.
    pub fn reap_children(&mut self) {
        self.live.retain(|_, handle| handle.poll());
    }
}

impl SpawnBackend for ProcessSupervisor {
    fn spawn(&mut self, entry: &WatchEntry, real_path: &Path, event: EventKind) -> Result<u32> {
        self.spawn_command(entry, real_path, event)
    }

    fn reap(&mut self) {
        self.reap_children();
    }

    fn shutdown(&mut self) {
        self.reap_children();
        if !self.live.is_empty() {
            info!(
                pids = ?self.live_pids(),
                "leaving running commands detached on shutdown"
            );
        }
    }
}
