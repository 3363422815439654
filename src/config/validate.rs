// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, RawWatchSpec, Settings, WatchSpec};
use crate::errors::{FirewatchError, Result};
use crate::exec::CommandTemplate;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FirewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let defaults = Settings::default();

        let reap_interval = match raw.reap_interval_ms {
            Some(0) => {
                return Err(FirewatchError::ConfigError(
                    "reap_interval_ms must be >= 1 (got 0)".to_string(),
                ));
            }
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };

        let settings = Settings {
            logfile: raw.logfile.unwrap_or(defaults.logfile),
            dumpfile: raw.dumpfile.unwrap_or(defaults.dumpfile),
            reap_interval,
        };

        let watches = raw
            .watch
            .into_iter()
            .map(validate_watch_spec)
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::from_parts(settings, watches))
    }
}

/// Check one raw rule and normalize its event list.
///
/// - the path must not be empty
/// - the command must not be blank
/// - at least one event must be given; duplicates are dropped, keeping the
///   first occurrence
pub fn validate_watch_spec(raw: RawWatchSpec) -> Result<WatchSpec> {
    if raw.path.as_os_str().is_empty() {
        return Err(FirewatchError::ConfigError(
            "watch rule has an empty path".to_string(),
        ));
    }

    if raw.command.trim().is_empty() {
        return Err(FirewatchError::ConfigError(format!(
            "watch rule for {:?} has an empty command",
            raw.path
        )));
    }

    let mut events = Vec::with_capacity(raw.events.len());
    for event in raw.events {
        if !events.contains(&event) {
            events.push(event);
        }
    }

    if events.is_empty() {
        return Err(FirewatchError::ConfigError(format!(
            "watch rule for {:?} has no events",
            raw.path
        )));
    }

    Ok(WatchSpec {
        path: raw.path,
        events,
        template: CommandTemplate::new(raw.command),
    })
}

/// A daemon with nothing to watch is a configuration error.
pub fn ensure_has_watches(cfg: &ConfigFile) -> Result<()> {
    if cfg.watches.is_empty() {
        return Err(FirewatchError::ConfigError(
            "no watch rules given (pass rules on the command line or [[watch]] tables in --config)"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn raw(events: Vec<EventKind>, command: &str) -> RawWatchSpec {
        RawWatchSpec {
            path: "/srv/in".into(),
            events,
            command: command.to_string(),
        }
    }

    #[test]
    fn blank_command_is_rejected() {
        let err = validate_watch_spec(raw(vec![EventKind::Created], "   ")).unwrap_err();
        assert!(matches!(err, FirewatchError::ConfigError(msg) if msg.contains("empty command")));
    }

    #[test]
    fn zero_reap_interval_is_rejected() {
        let cfg = RawConfigFile {
            reap_interval_ms: Some(0),
            ..RawConfigFile::default()
        };
        assert!(ConfigFile::try_from(cfg).is_err());
    }

    #[test]
    fn defaults_apply_to_missing_settings() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.settings, Settings::default());
        assert!(ensure_has_watches(&cfg).is_err());
    }
}
