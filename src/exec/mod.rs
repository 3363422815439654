// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`template`] renders a rule's command for one event.
//! - [`dump`] owns the append-only subcommand dump file.
//! - [`supervisor`] launches commands through a shell with
//!   `tokio::process::Command`, records each exit in the dump file as it
//!   happens, and sweeps finished children without blocking.
//! - [`backend`] provides the `SpawnBackend` trait the dispatch loop talks
//!   to, which tests can replace with a fake implementation.

pub mod backend;
pub mod dump;
pub mod supervisor;
pub mod template;

pub use backend::SpawnBackend;
pub use dump::DumpFile;
pub use supervisor::{ChildHandle, ProcessSupervisor};
pub use template::{CommandTemplate, RenderContext, PLACEHOLDERS};
