// src/config/mod.rs

//! Configuration loading and validation for firewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Parse command-line watch rules (`rule.rs`).
//! - Load a config file from disk and merge it with the CLI (`loader.rs`).
//! - Validate rules and settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod rule;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{ConfigFile, RawConfigFile, RawWatchSpec, Settings, WatchSpec};
pub use rule::parse_rule;
pub use validate::validate_watch_spec;
