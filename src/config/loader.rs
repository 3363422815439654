// src/config/loader.rs

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::rule::parse_rule;
use crate::config::validate::ensure_has_watches;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to
/// also check the rules.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Build the effective configuration for one daemon run.
///
/// - Starts from `--config` (if given) or defaults.
/// - Appends rules given on the command line after the file's rules.
/// - Explicit `--logfile` / `--dumpfile` / `--reap-interval-ms` override the
///   file.
/// - Fails if no rule remains.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = match &args.config {
        Some(path) => load_and_validate(path)?,
        None => ConfigFile::try_from(RawConfigFile::default())?,
    };

    for rule in &args.watches {
        cfg.watches.push(parse_rule(rule)?);
    }

    if let Some(logfile) = &args.logfile {
        cfg.settings.logfile = logfile.clone();
    }
    if let Some(dumpfile) = &args.dumpfile {
        cfg.settings.dumpfile = dumpfile.clone();
    }
    if let Some(ms) = args.reap_interval_ms {
        cfg.settings.reap_interval = Some(Duration::from_millis(ms));
    }

    ensure_has_watches(&cfg)?;
    Ok(cfg)
}
