// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, WatchSpec};
use crate::engine::{DispatchLoop, Dispatcher, RuntimeEvent};
use crate::errors::Result;
use crate::exec::{DumpFile, ProcessSupervisor, PLACEHOLDERS};
use crate::watch::WatchRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - watch registration (creating missing directories)
/// - the dump file and process supervisor
/// - the dispatch loop
/// - the file watcher
/// - Ctrl-C handling and the optional periodic reap tick
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let registry = build_registry(&cfg.watches)?;

    let dump = DumpFile::open(&cfg.settings.dumpfile)?;
    let own_outputs = own_output_paths(&dump, &cfg);
    let supervisor = ProcessSupervisor::new(dump);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);

    let dirs: Vec<PathBuf> = registry.paths().map(PathBuf::from).collect();
    let _watcher_handle = crate::watch::spawn_watcher(dirs, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    if let Some(period) = cfg.settings.reap_interval {
        info!(?period, "periodic reaping enabled");
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(RuntimeEvent::ReapRequested).await.is_err() {
                    break;
                }
            }
        });
    }

    drop(rt_tx);

    let dispatcher = Dispatcher::new(registry, own_outputs);
    DispatchLoop::new(dispatcher, rt_rx, supervisor).run().await
}

/// Register every rule in order.
pub fn build_registry(watches: &[WatchSpec]) -> Result<WatchRegistry> {
    let mut registry = WatchRegistry::new();
    for spec in watches {
        registry.register(&spec.path, spec.events.iter().copied(), spec.template.clone())?;
    }
    Ok(registry)
}

/// Files the daemon writes itself: the dump file always, the log file when
/// it can be resolved.
fn own_output_paths(dump: &DumpFile, cfg: &ConfigFile) -> Vec<PathBuf> {
    let mut paths = vec![dump.path().to_path_buf()];
    match std::fs::canonicalize(&cfg.settings.logfile) {
        Ok(logfile) => paths.push(logfile),
        Err(err) => warn!(
            path = ?cfg.settings.logfile,
            error = %err,
            "could not resolve log file; its changes will not be filtered"
        ),
    }
    paths
}

/// Print the supported placeholders.
pub fn print_placeholders() {
    println!("Command placeholders (substituted in this order):");
    for ph in PLACEHOLDERS {
        println!("  {}  {}", ph.token, ph.help);
    }
}

fn print_dry_run(cfg: &ConfigFile) {
    println!("firewatch dry-run");
    println!("  logfile:  {:?}", cfg.settings.logfile);
    println!("  dumpfile: {:?}", cfg.settings.dumpfile);
    match cfg.settings.reap_interval {
        Some(period) => println!("  reap interval: {period:?}"),
        None => println!("  reap interval: on spawn only"),
    }
    println!("  watches:");
    for spec in &cfg.watches {
        let events: Vec<&str> = spec.events.iter().map(|e| e.as_str()).collect();
        println!("    - {:?}", spec.path);
        println!("      events: {}", events.join(", "));
        println!("      command: {}", spec.template);
    }

    debug!("dry-run complete (no execution)");
}
