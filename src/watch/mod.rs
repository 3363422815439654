// src/watch/mod.rs

//! Watch rules and filesystem change detection.
//!
//! This module is responsible for:
//! - Holding the registered rules and matching changed paths back to them
//!   ([`registry`]).
//! - Wiring up a cross-platform filesystem watcher (`notify`) and turning its
//!   events into `(ChangeKind, path)` notifications ([`watcher`], [`event`]).
//!
//! It does **not** render or run commands; that is the job of `exec`.

pub mod event;
pub mod path_utils;
pub mod registry;
pub mod watcher;

pub use event::{notifications_from_event, Notification};
pub use registry::{WatchEntry, WatchRegistry};
pub use watcher::{spawn_watcher, WatcherHandle};
