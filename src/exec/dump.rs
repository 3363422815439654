// src/exec/dump.rs

//! The subcommand dump file.
//!
//! Every executed command gets two lines:
//!
//! ```text
//! [2024-03-07 09:05:02] - `echo new.txt`
//! [2024-03-07 09:05:02] - `echo new.txt` finished with exit code: 0
//! ```
//!
//! Children inherit the same append-mode file as stdout and stderr, so their
//! output lands between the two lines. The second line is written as soon as
//! the child exits. A command that cannot be launched at all gets a
//! `failed to start` line in place of the second one.
//!
//! The handle is cheap to clone; every clone appends to the same file.

use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use chrono::{DateTime, Local};

use crate::errors::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct DumpFile {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl DumpFile {
    /// Open (or create) the dump file in append mode, creating parent
    /// directories as needed. The stored path is canonical so it can be
    /// compared against notification paths.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dump file directory {:?}", parent))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening dump file {:?}", path))?;

        let path = fs::canonicalize(path)
            .with_context(|| format!("canonicalizing dump file path {:?}", path))?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_started(&self, at: &DateTime<Local>, command: &str) -> Result<()> {
        self.append(format_args!("[{}] - `{}`", at.format(TIMESTAMP_FORMAT), command))
    }

    pub fn write_finished(&self, at: &DateTime<Local>, command: &str, exit_code: i32) -> Result<()> {
        self.append(format_args!(
            "[{}] - `{}` finished with exit code: {}",
            at.format(TIMESTAMP_FORMAT),
            command,
            exit_code
        ))
    }

    pub fn write_spawn_failed(
        &self,
        at: &DateTime<Local>,
        command: &str,
        reason: impl Display,
    ) -> Result<()> {
        self.append(format_args!(
            "[{}] - `{}` failed to start: {}",
            at.format(TIMESTAMP_FORMAT),
            command,
            reason
        ))
    }

    /// A fresh handle on the same open file, for a child's stdout/stderr.
    pub fn child_stdio(&self) -> Result<Stdio> {
        Ok(Stdio::from(self.lock().try_clone()?))
    }

    fn append(&self, line: std::fmt::Arguments<'_>) -> Result<()> {
        let mut file = self.lock();
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }

    // Poisoning is ignored; the file stays appendable.
    fn lock(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
