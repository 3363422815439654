// src/watch/registry.rs

//! The set of registered watch rules.
//!
//! Entries are keyed by canonical directory path and kept in registration
//! order. Matching a changed file back to its rule is a plain string-prefix
//! test on that order: the first entry whose path string prefixes the
//! changed file's directory wins. This is not component aware, so a rule for
//! `/tmp/foo` also claims changes under `/tmp/foobar`.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{FirewatchError, Result};
use crate::exec::template::CommandTemplate;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::EventKind;
use crate::watch::path_utils::normalize_lexically;

/// One registered rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    canonical_path: PathBuf,
    events: BTreeSet<EventKind>,
    template: CommandTemplate,
}

impl WatchEntry {
    pub fn canonical_path(&self) -> &Path {
        &self.canonical_path
    }

    pub fn events(&self) -> &BTreeSet<EventKind> {
        &self.events
    }

    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }

    pub fn reacts_to(&self, event: EventKind) -> bool {
        self.events.contains(&event)
    }
}

#[derive(Debug)]
pub struct WatchRegistry {
    fs: Arc<dyn FileSystem>,
    entries: Vec<WatchEntry>,
    slots: HashMap<PathBuf, usize>,
}

impl Default for WatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            entries: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    /// Register a rule for `path`.
    ///
    /// The directory is created when missing, then canonicalized. Registering
    /// a path that canonicalizes to an existing key replaces that entry but
    /// keeps its position.
    pub fn register(
        &mut self,
        path: impl AsRef<Path>,
        events: impl IntoIterator<Item = EventKind>,
        template: CommandTemplate,
    ) -> Result<&WatchEntry> {
        let path = path.as_ref();
        let events: BTreeSet<EventKind> = events.into_iter().collect();
        if events.is_empty() {
            return Err(FirewatchError::ConfigError(format!(
                "watch rule for {:?} has no events",
                path
            )));
        }

        let canonical_path = self.prepare_dir(path)?;

        let entry = WatchEntry {
            canonical_path: canonical_path.clone(),
            events,
            template,
        };

        let slot = match self.slots.get(&canonical_path) {
            Some(&slot) => {
                debug!(path = ?canonical_path, "replacing existing watch rule");
                self.entries[slot] = entry;
                slot
            }
            None => {
                let slot = self.entries.len();
                self.entries.push(entry);
                self.slots.insert(canonical_path, slot);
                slot
            }
        };

        let entry = &self.entries[slot];
        let events: Vec<&str> = entry.events.iter().map(|e| e.as_str()).collect();
        info!(
            path = ?entry.canonical_path,
            ?events,
            command = %entry.template,
            "watching directory"
        );
        Ok(entry)
    }

    fn prepare_dir(&self, path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.fs.current_dir()?.join(path)
        };
        let absolute = normalize_lexically(&absolute);

        let registration_error = |source: std::io::Error| FirewatchError::Registration {
            path: absolute.clone(),
            source,
        };

        if !self.fs.exists(&absolute) {
            debug!(path = ?absolute, "creating missing watch directory");
            self.fs
                .create_dir_all(&absolute)
                .map_err(|e| registration_error(std::io::Error::other(format!("{e:#}"))))?;
        }

        let canonical = self
            .fs
            .canonicalize(&absolute)
            .map_err(|e| registration_error(std::io::Error::other(format!("{e:#}"))))?;

        if !self.fs.is_dir(&canonical) {
            return Err(registration_error(std::io::Error::other("not a directory")));
        }

        Ok(canonical)
    }

    /// First entry, in registration order, whose canonical path string is a
    /// prefix of `changed_dir`.
    pub fn match_dir(&self, changed_dir: &str) -> Option<&WatchEntry> {
        self.entries
            .iter()
            .find(|entry| changed_dir.starts_with(entry.canonical_path.to_string_lossy().as_ref()))
    }

    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.canonical_path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn registry() -> (WatchRegistry, MockFileSystem) {
        let fs = MockFileSystem::with_cwd("/work");
        (WatchRegistry::with_fs(Arc::new(fs.clone())), fs)
    }

    #[test]
    fn register_creates_missing_directory() {
        let (mut reg, fs) = registry();
        reg.register("/tmp/watched", [EventKind::Created], CommandTemplate::new("true"))
            .unwrap();
        assert!(fs.is_dir(Path::new("/tmp/watched")));
    }

    #[test]
    fn register_canonicalizes_relative_and_symlinked_paths() {
        let (mut reg, fs) = registry();
        fs.add_dir("/data/real");
        fs.add_symlink("/work/link", "/data/real");

        let entry = reg
            .register("./link/", [EventKind::Modified], CommandTemplate::new("true"))
            .unwrap();
        assert_eq!(entry.canonical_path(), Path::new("/data/real"));
    }

    #[test]
    fn register_deduplicates_events() {
        let (mut reg, _fs) = registry();
        let entry = reg
            .register(
                "/a",
                [EventKind::Created, EventKind::Created, EventKind::Deleted],
                CommandTemplate::new("true"),
            )
            .unwrap();
        assert_eq!(entry.events().len(), 2);
    }

    #[test]
    fn register_rejects_empty_events() {
        let (mut reg, _fs) = registry();
        let err = reg
            .register("/a", Vec::<EventKind>::new(), CommandTemplate::new("true"))
            .unwrap_err();
        assert!(matches!(err, FirewatchError::ConfigError(_)));
    }

    #[test]
    fn register_rejects_file_path() {
        let (mut reg, fs) = registry();
        fs.add_file("/a/file.txt");
        let err = reg
            .register("/a/file.txt", [EventKind::Created], CommandTemplate::new("true"))
            .unwrap_err();
        assert!(matches!(err, FirewatchError::Registration { .. }));
    }

    #[test]
    fn duplicate_registration_replaces_in_place() {
        let (mut reg, fs) = registry();
        fs.add_dir("/data/real");
        fs.add_symlink("/work/link", "/data/real");

        reg.register("/data/real", [EventKind::Created], CommandTemplate::new("first"))
            .unwrap();
        reg.register("/other", [EventKind::Created], CommandTemplate::new("other"))
            .unwrap();
        reg.register("link", [EventKind::Deleted], CommandTemplate::new("second"))
            .unwrap();

        assert_eq!(reg.len(), 2);
        let first = &reg.entries()[0];
        assert_eq!(first.canonical_path(), Path::new("/data/real"));
        assert_eq!(first.template().raw(), "second");
        assert!(first.reacts_to(EventKind::Deleted));
        assert!(!first.reacts_to(EventKind::Created));
    }

    #[test]
    fn first_registered_prefix_wins() {
        let (mut reg, _fs) = registry();
        reg.register("/tmp/foo", [EventKind::Created], CommandTemplate::new("foo"))
            .unwrap();
        reg.register("/tmp/foobar", [EventKind::Created], CommandTemplate::new("foobar"))
            .unwrap();

        let hit = reg.match_dir("/tmp/foobar/x").unwrap();
        assert_eq!(hit.canonical_path(), Path::new("/tmp/foo"));
        assert!(reg.match_dir("/tmp/fo").is_none());
        assert!(reg.match_dir("/var/tmp/foo").is_none());
    }
}
