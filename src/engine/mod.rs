// src/engine/mod.rs

//! Dispatch engine for firewatch.
//!
//! This module ties together:
//! - the watch registry (which rule owns a changed path)
//! - the spawn backend (how a matched rule's command is run)
//! - the main event loop that reacts to:
//!   - filesystem notifications
//!   - periodic reap ticks
//!   - shutdown signals
//!
//! The decision logic lives in [`core`]; the async/IO shell is implemented
//! in [`runtime`].

use crate::watch::Notification;

/// Events flowing into the dispatch loop from the watcher, timers, signals.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A watched path changed.
    Notification(Notification),
    /// Poll running children without spawning anything.
    ReapRequested,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod runtime;

pub use self::core::{Dispatch, Dispatcher, IgnoreReason};
pub use self::runtime::DispatchLoop;
