// src/config/rule.rs

//! Command-line watch rule grammar.
//!
//! A rule looks like `<dirpath>,[<EVENT>, ...],<command>`, e.g.
//! `/tmp,[CREATED,MODIFIED],echo new file at %r`. The directory is
//! everything before the last `,[...],` group whose brackets hold only
//! letters, commas, and spaces; the command is everything after it and may
//! itself contain commas.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::model::{RawWatchSpec, WatchSpec};
use crate::config::validate::validate_watch_spec;
use crate::errors::{FirewatchError, Result};
use crate::types::EventKind;

const RULE_PATTERN: &str = r"^(.+)\s*,\s*\[([A-Za-z, ]+)\]\s*,\s*(.+)$";

pub const RULE_SYNTAX_HELP: &str = "expected \"<dirpath>,[<event1>, ...],<command>\" where events are \
CREATED, MODIFIED or DELETED, e.g. \"/tmp,[CREATED,MODIFIED],echo newfile at %r\"";

fn rule_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RULE_PATTERN).expect("rule pattern is a valid regex"))
}

/// Parse one command-line rule into a validated [`WatchSpec`].
pub fn parse_rule(rule: &str) -> Result<WatchSpec> {
    let invalid = |reason: String| FirewatchError::InvalidRule {
        rule: rule.to_string(),
        reason,
    };

    let caps = rule_regex()
        .captures(rule.trim())
        .ok_or_else(|| invalid(RULE_SYNTAX_HELP.to_string()))?;

    let path = caps[1].trim();
    let command = caps[3].trim();

    let events = caps[2]
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse::<EventKind>)
        .collect::<Result<Vec<_>>>()
        .map_err(|err| invalid(err.to_string()))?;

    validate_watch_spec(RawWatchSpec {
        path: path.into(),
        events,
        command: command.to_string(),
    })
    .map_err(|err| match err {
        FirewatchError::ConfigError(reason) => invalid(reason),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_basic_rule() {
        let spec = parse_rule("/tmp,[CREATED,MODIFIED],echo newfile at %r").unwrap();
        assert_eq!(spec.path, PathBuf::from("/tmp"));
        assert_eq!(spec.events, vec![EventKind::Created, EventKind::Modified]);
        assert_eq!(spec.template.raw(), "echo newfile at %r");
    }

    #[test]
    fn tolerates_spaces_and_lower_case_events() {
        let spec = parse_rule("  /srv/in , [created, Deleted] , mv %r /srv/done  ").unwrap();
        assert_eq!(spec.path, PathBuf::from("/srv/in"));
        assert_eq!(spec.events, vec![EventKind::Created, EventKind::Deleted]);
        assert_eq!(spec.template.raw(), "mv %r /srv/done");
    }

    #[test]
    fn duplicate_events_keep_first_occurrence() {
        let spec = parse_rule("/a,[DELETED,CREATED,DELETED],true").unwrap();
        assert_eq!(spec.events, vec![EventKind::Deleted, EventKind::Created]);
    }

    #[test]
    fn command_may_contain_commas() {
        let spec = parse_rule("/a,[CREATED],printf '%s,%s\\n' a b").unwrap();
        assert_eq!(spec.template.raw(), "printf '%s,%s\\n' a b");
    }

    #[test]
    fn rejects_missing_event_list() {
        let err = parse_rule("/a,echo hi").unwrap_err();
        assert!(matches!(err, FirewatchError::InvalidRule { .. }));
    }

    #[test]
    fn rejects_unknown_event() {
        match parse_rule("/a,[CREATED,RENAMED],echo hi") {
            Err(FirewatchError::InvalidRule { reason, .. }) => assert!(reason.contains("RENAMED")),
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_event_list() {
        let err = parse_rule("/a,[ , ],echo hi").unwrap_err();
        assert!(matches!(err, FirewatchError::InvalidRule { .. }));
    }
}
