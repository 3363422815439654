// src/fs/mod.rs

//! Filesystem seam used by watch registration and path resolution.
//!
//! Production code goes through [`RealFileSystem`]; tests can swap in
//! [`mock::MockFileSystem`] to exercise registry semantics on paths such as
//! `/tmp/foo` without touching the disk.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Resolve `path` to its absolute, symlink-free form.
    ///
    /// Fails when the path does not exist.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    fn current_dir(&self) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating dir {:?}", path))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().context("reading current working directory")
    }
}
