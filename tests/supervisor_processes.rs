// tests/supervisor_processes.rs
//
// These tests launch real `sh -c` processes.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, wait_for_file};

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;

use firewatch::engine::{DispatchLoop, Dispatcher, RuntimeEvent};
use firewatch::exec::{CommandTemplate, DumpFile, ProcessSupervisor};
use firewatch::types::{ChangeKind, EventKind};
use firewatch::watch::{Notification, WatchRegistry};

type TestResult = Result<(), Box<dyn Error>>;

fn supervisor(dump: &Path) -> Result<ProcessSupervisor, Box<dyn Error>> {
    Ok(ProcessSupervisor::new(DumpFile::open(dump)?))
}

fn dispatch_loop(
    registry: WatchRegistry,
    sup: ProcessSupervisor,
) -> DispatchLoop<ProcessSupervisor> {
    let own = vec![sup.dump_path().to_path_buf()];
    let (_tx, rx) = mpsc::channel::<RuntimeEvent>(1);
    DispatchLoop::new(Dispatcher::new(registry, own), rx, sup)
}

/// Reap until `pid` leaves the live set. Only used once the child's finish
/// line is already in the dump file.
async fn reap_until_gone(dl: &mut DispatchLoop<ProcessSupervisor>, pid: u32) -> Result<(), Box<dyn Error>> {
    for _ in 0..250 {
        dl.step(RuntimeEvent::ReapRequested)?;
        if !dl.backend().live_pids().contains(&pid) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Err(format!("pid {pid} was never reaped").into())
}

#[tokio::test]
async fn created_file_runs_command_between_two_dump_lines() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("watched");
    let dump = tmp.path().join("logs/dump.log");

    let mut registry = WatchRegistry::new();
    registry.register(&watched, [EventKind::Created], CommandTemplate::new("echo %f"))?;
    let watched = std::fs::canonicalize(&watched)?;

    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    let pid = dl
        .dispatch(&Notification::new(ChangeKind::Added, watched.join("new.txt")))?
        .ok_or("nothing spawned")?;

    let contents = wait_for_file(&dump, |c| c.contains("finished with exit code")).await;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected dump contents:\n{contents}");
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] - `echo new.txt`"));
    assert_eq!(lines[1], "new.txt");
    assert!(lines[2].ends_with("] - `echo new.txt` finished with exit code: 0"));
    // Both lines carry the dispatch timestamp.
    assert_eq!(&lines[0][..21], &lines[2][..21]);

    reap_until_gone(&mut dl, pid).await?;
    Ok(())
}

#[tokio::test]
async fn finish_line_is_written_when_a_lone_child_exits() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("w");
    let dump = tmp.path().join("dump.log");

    let mut registry = WatchRegistry::new();
    registry.register(&watched, [EventKind::Created], CommandTemplate::new("sleep 0.2; echo %f"))?;
    let watched = std::fs::canonicalize(&watched)?;
    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    let pid = dl
        .dispatch(&Notification::new(ChangeKind::Added, watched.join("new.txt")))?
        .ok_or("nothing spawned")?;

    // No further event and no reap pass: the finish line must still appear.
    let contents = wait_for_file(&dump, |c| c.contains("finished with exit code")).await;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected dump contents:\n{contents}");
    assert!(lines[0].ends_with("] - `sleep 0.2; echo new.txt`"));
    assert_eq!(lines[1], "new.txt");
    assert!(lines[2].ends_with("] - `sleep 0.2; echo new.txt` finished with exit code: 0"));

    // The live set only changes on a sweep.
    assert!(dl.backend().live_pids().contains(&pid));
    reap_until_gone(&mut dl, pid).await?;

    Ok(())
}

#[tokio::test]
async fn overlapping_commands_each_get_their_own_finish_line() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("w");
    let dump = tmp.path().join("dump.log");

    let mut registry = WatchRegistry::new();
    registry.register(&watched, [EventKind::Created], CommandTemplate::new("sleep 0.3; echo slow %f"))?;
    registry.register(tmp.path().join("v"), [EventKind::Created], CommandTemplate::new("echo fast %f"))?;
    let watched = std::fs::canonicalize(&watched)?;
    let fast_dir = std::fs::canonicalize(tmp.path().join("v"))?;
    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    dl.dispatch(&Notification::new(ChangeKind::Added, watched.join("a")))?
        .ok_or("slow not spawned")?;
    dl.dispatch(&Notification::new(ChangeKind::Added, fast_dir.join("b")))?
        .ok_or("fast not spawned")?;

    let contents = wait_for_file(&dump, |c| c.matches("finished with exit code: 0").count() == 2).await;
    let fast_done = contents.find("`echo fast b` finished").ok_or("fast finish missing")?;
    let slow_out = contents.find("slow a\n").ok_or("slow output missing")?;
    let slow_done = contents.find("`sleep 0.3; echo slow a` finished").ok_or("slow finish missing")?;
    assert!(fast_done < slow_out, "fast finish line should precede slow output:\n{contents}");
    assert!(slow_out < slow_done);

    Ok(())
}

#[tokio::test]
async fn finished_child_is_reaped_by_the_next_spawn() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("w");
    let dump = tmp.path().join("dump.log");

    let mut registry = WatchRegistry::new();
    registry.register(&watched, [EventKind::Modified], CommandTemplate::new("echo ran %f"))?;
    let watched = std::fs::canonicalize(&watched)?;
    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    let first = dl
        .dispatch(&Notification::new(ChangeKind::Modified, watched.join("one")))?
        .ok_or("first not spawned")?;
    assert!(dl.backend().live_pids().contains(&first));

    // The first child exits and is recorded, but stays tracked until a sweep.
    wait_for_file(&dump, |c| c.contains("`echo ran one` finished with exit code: 0")).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(dl.backend().live_pids().contains(&first));

    let second = dl
        .dispatch(&Notification::new(ChangeKind::Modified, watched.join("two")))?
        .ok_or("second not spawned")?;

    assert_ne!(first, second);
    assert!(!dl.backend().live_pids().contains(&first));

    wait_for_file(&dump, |c| c.contains("`echo ran two` finished with exit code: 0")).await;
    reap_until_gone(&mut dl, second).await?;
    Ok(())
}

#[tokio::test]
async fn same_event_twice_gives_two_children_and_two_records() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("w");
    let dump = tmp.path().join("dump.log");

    let mut registry = WatchRegistry::new();
    registry.register(&watched, [EventKind::Created], CommandTemplate::new("exit 3"))?;
    let watched = std::fs::canonicalize(&watched)?;
    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    let n = Notification::new(ChangeKind::Added, watched.join("dup"));
    let a = dl.dispatch(&n)?.ok_or("a not spawned")?;
    let b = dl.dispatch(&n)?.ok_or("b not spawned")?;
    assert_ne!(a, b);

    let contents =
        wait_for_file(&dump, |c| c.matches("`exit 3` finished with exit code: 3").count() == 2).await;
    assert_eq!(contents.matches("] - `exit 3`\n").count(), 2);

    reap_until_gone(&mut dl, a).await?;
    reap_until_gone(&mut dl, b).await?;

    Ok(())
}

#[tokio::test]
async fn dump_file_inside_watched_directory_is_ignored() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("w");
    let mut registry = WatchRegistry::new();
    registry.register(&watched, EventKind::ALL, CommandTemplate::new("echo %f"))?;

    let dump = watched.join("dump.log");
    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    let spawned = dl.dispatch(&Notification::new(ChangeKind::Modified, &dump))?;
    assert_eq!(spawned, None);
    assert!(dl.backend().live_pids().is_empty());
    assert_eq!(std::fs::read_to_string(&dump)?, "");

    Ok(())
}

#[tokio::test]
async fn unknown_command_is_a_child_failure_not_a_spawn_error() -> TestResult {
    init_tracing();

    // A command the shell cannot find still launches the shell itself and
    // exits 127; it is not a spawn failure.
    let tmp = tempfile::tempdir()?;
    let watched = tmp.path().join("w");
    let dump = tmp.path().join("dump.log");

    let mut registry = WatchRegistry::new();
    registry.register(&watched, [EventKind::Created], CommandTemplate::new("definitely-not-a-command-xyz"))?;
    let watched = std::fs::canonicalize(&watched)?;
    let mut dl = dispatch_loop(registry, supervisor(&dump)?);

    let pid = dl
        .dispatch(&Notification::new(ChangeKind::Added, watched.join("f")))?
        .ok_or("not spawned")?;

    wait_for_file(&dump, |c| c.contains("finished with exit code: 127")).await;
    reap_until_gone(&mut dl, pid).await?;

    Ok(())
}
