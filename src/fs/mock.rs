// src/fs/mock.rs

use super::FileSystem;
use crate::watch::path_utils::normalize_lexically;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    dirs: HashSet<PathBuf>,
    files: HashSet<PathBuf>,
    // link path -> target
    links: BTreeMap<PathBuf, PathBuf>,
}

/// In-memory filesystem with directories, files and directory symlinks.
///
/// Paths are normalized lexically; relative paths resolve against `cwd`.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
    cwd: PathBuf,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_cwd("/")
    }

    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let fs = Self {
            state: Arc::new(Mutex::new(MockState::default())),
            cwd: cwd.clone(),
        };
        fs.add_dir(&cwd);
        fs
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.absolute(path.as_ref());
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = self.absolute(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.state.lock().unwrap().files.insert(path);
    }

    /// Register `link` as a symlink pointing at the directory `target`.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = self.absolute(link.as_ref());
        let target = self.absolute(target.as_ref());
        self.state.lock().unwrap().links.insert(link, target);
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        normalize_lexically(&self.cwd.join(path))
    }

    fn resolve_links(&self, path: &Path) -> PathBuf {
        let state = self.state.lock().unwrap();
        // Among links that prefix `path`, the longest sorts last.
        let hit = state
            .links
            .iter()
            .rev()
            .find(|(link, _)| path.starts_with(link));
        match hit {
            Some((link, target)) => match path.strip_prefix(link) {
                Ok(rest) if rest.as_os_str().is_empty() => target.clone(),
                Ok(rest) => target.join(rest),
                Err(_) => path.to_path_buf(),
            },
            None => path.to_path_buf(),
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let path = self.resolve_links(&self.absolute(path));
        let state = self.state.lock().unwrap();
        state.dirs.contains(&path) || state.files.contains(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = self.resolve_links(&self.absolute(path));
        self.state.lock().unwrap().dirs.contains(&path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.resolve_links(&self.absolute(path));
        if self.state.lock().unwrap().files.contains(&path) {
            return Err(anyhow!("File exists: {:?}", path));
        }
        self.add_dir(path);
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let resolved = self.resolve_links(&self.absolute(path));
        let state = self.state.lock().unwrap();
        if state.dirs.contains(&resolved) || state.files.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(anyhow!("No such file or directory: {:?}", path))
        }
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}
