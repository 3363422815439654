// src/watch/event.rs

//! Translation from raw `notify` events into `(ChangeKind, path)` pairs.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind as NotifyKind};

use crate::types::ChangeKind;

/// One change to one path, as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub change: ChangeKind,
    pub path: PathBuf,
}

impl Notification {
    pub fn new(change: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            change,
            path: path.into(),
        }
    }
}

/// Split a notify event into per-path notifications.
///
/// Renames become a removal of the old name and a creation of the new one.
/// Access events and events notify cannot classify yield nothing.
pub fn notifications_from_event(event: Event) -> Vec<Notification> {
    let per_path = |change: ChangeKind, paths: Vec<PathBuf>| -> Vec<Notification> {
        paths
            .into_iter()
            .map(|path| Notification::new(change, path))
            .collect()
    };

    match event.kind {
        NotifyKind::Create(_) => per_path(ChangeKind::Added, event.paths),
        NotifyKind::Remove(_) => per_path(ChangeKind::Removed, event.paths),
        NotifyKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => per_path(ChangeKind::Removed, event.paths),
            RenameMode::To => per_path(ChangeKind::Added, event.paths),
            RenameMode::Both => {
                let mut paths = event.paths.into_iter();
                let mut out = Vec::with_capacity(2);
                if let Some(from) = paths.next() {
                    out.push(Notification::new(ChangeKind::Removed, from));
                }
                out.extend(paths.map(|to| Notification::new(ChangeKind::Added, to)));
                out
            }
            // Backends that can't tell the two halves apart: decide by
            // whether the path is still there.
            RenameMode::Any | RenameMode::Other => event
                .paths
                .into_iter()
                .map(|path| {
                    let change = if path.exists() {
                        ChangeKind::Added
                    } else {
                        ChangeKind::Removed
                    };
                    Notification::new(change, path)
                })
                .collect(),
        },
        NotifyKind::Modify(_) => per_path(ChangeKind::Modified, event.paths),
        NotifyKind::Access(_) | NotifyKind::Any | NotifyKind::Other => Vec::new(),
    }
}
