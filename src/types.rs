use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::FirewatchError;

/// Domain event category a watch rule can react to.
///
/// Parsed case-insensitively (`"created"`, `"Created"`, `"CREATED"`) and
/// displayed upper-case, which is also the value substituted for `%e`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum EventKind {
    Created,
    Modified,
    Deleted,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Created, EventKind::Modified, EventKind::Deleted];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Created => "CREATED",
            EventKind::Modified => "MODIFIED",
            EventKind::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = FirewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATED" => Ok(EventKind::Created),
            "MODIFIED" => Ok(EventKind::Modified),
            "DELETED" => Ok(EventKind::Deleted),
            _ => Err(FirewatchError::UnknownEvent(s.trim().to_string())),
        }
    }
}

impl TryFrom<String> for EventKind {
    type Error = FirewatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Change vocabulary produced by the filesystem watcher.
///
/// This is deliberately closed: the watcher adapter drops notify events that
/// have no counterpart here, so every value that reaches the dispatcher has
/// exactly one [`EventKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl From<ChangeKind> for EventKind {
    fn from(change: ChangeKind) -> Self {
        match change {
            ChangeKind::Added => EventKind::Created,
            ChangeKind::Modified => EventKind::Modified,
            ChangeKind::Removed => EventKind::Deleted,
        }
    }
}
