#![allow(dead_code)]

use std::path::PathBuf;

use firewatch::config::{ConfigFile, RawConfigFile, RawWatchSpec};
use firewatch::types::EventKind;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_watch(mut self, watch: RawWatchSpec) -> Self {
        self.config.watch.push(watch);
        self
    }

    pub fn with_dumpfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dumpfile = Some(path.into());
        self
    }

    pub fn with_logfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.logfile = Some(path.into());
        self
    }

    pub fn with_reap_interval_ms(mut self, ms: u64) -> Self {
        self.config.reap_interval_ms = Some(ms);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RawWatchSpec`.
pub struct WatchSpecBuilder {
    spec: RawWatchSpec,
}

impl WatchSpecBuilder {
    pub fn new(path: impl Into<PathBuf>, command: &str) -> Self {
        Self {
            spec: RawWatchSpec {
                path: path.into(),
                events: vec![],
                command: command.to_string(),
            },
        }
    }

    pub fn on(mut self, event: EventKind) -> Self {
        self.spec.events.push(event);
        self
    }

    pub fn on_all(mut self) -> Self {
        self.spec.events.extend(EventKind::ALL);
        self
    }

    pub fn build(self) -> RawWatchSpec {
        self.spec
    }
}
