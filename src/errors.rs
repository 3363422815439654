// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid watch rule \"{rule}\": {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Unknown event \"{0}\" (expected CREATED, MODIFIED or DELETED)")]
    UnknownEvent(String),

    #[error("Cannot register watch directory {path:?}: {source}")]
    Registration {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FirewatchError>;
