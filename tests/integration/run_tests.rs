//! End-to-end runs through the runner and the CLI entry point.

use clap::Parser;
use dupsweep::actions::Action;
use dupsweep::cli::Cli;
use dupsweep::error::ExitCode;
use dupsweep::progress::CollectingSink;
use dupsweep::runner::{self, Mode, RunError, RunRequest};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn app(args: &[&str]) -> anyhow::Result<ExitCode> {
    let mut argv = vec!["dupsweep", "-q"];
    argv.extend_from_slice(args);
    dupsweep::run_app(Cli::try_parse_from(argv).unwrap())
}

#[test]
fn test_run_within_move() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("A.txt"), b"x");
    write(&dir.path().join("B.txt"), b"x");
    write(&dir.path().join("C.txt"), b"y");

    let sink = CollectingSink::new();
    let outcome = runner::run(&RunRequest::new(dir.path()), &sink).unwrap();

    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.resolved_count(), 1);
    assert_eq!(outcome.message(), "Moved 1 duplicates to _duplicates.");
    assert!(dir.path().join("_duplicates").join("B.txt").exists());

    let lines = sink.lines();
    assert_eq!(lines[0], "Mode: Within A");
    assert!(lines.contains(&"Recursive: ON".to_string()));
}

#[test]
fn test_run_a_vs_b_delete() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d1.txt"), b"x");
    write(&b.path().join("d2.txt"), b"y");

    let request = RunRequest::new(a.path())
        .with_dir_b(b.path())
        .with_mode(Mode::AVsB)
        .with_action(Action::Delete);
    let outcome = runner::run(&request, &CollectingSink::new()).unwrap();

    assert_eq!(outcome.message(), "Deleted 1 duplicates.");
    assert!(a.path().join("k.txt").exists());
    assert!(!b.path().join("d1.txt").exists());
    assert!(b.path().join("d2.txt").exists());
}

#[test]
fn test_run_b_vs_a_moves_into_a() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("copy.bin"), b"payload");
    write(&b.path().join("master.bin"), b"payload");

    let request = RunRequest::new(a.path())
        .with_dir_b(b.path())
        .with_mode(Mode::BVsA);
    let sink = CollectingSink::new();
    let outcome = runner::run(&request, &sink).unwrap();

    assert_eq!(outcome.resolved_count(), 1);
    assert!(b.path().join("master.bin").exists());
    assert!(a.path().join("_duplicates").join("copy.bin").exists());
    assert!(!b.path().join("_duplicates").exists());
    assert_eq!(sink.lines()[0], "Mode: Compare B vs A (remove from A)");
}

#[test]
fn test_run_no_duplicates_touches_nothing() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"1");
    write(&dir.path().join("b.txt"), b"2");

    let outcome = runner::run(&RunRequest::new(dir.path()), &CollectingSink::new()).unwrap();

    assert!(outcome.pairs.is_empty());
    assert!(outcome.batch.is_none());
    assert_eq!(outcome.message(), "No duplicates found.");
    assert!(!dir.path().join("_duplicates").exists());
}

#[test]
fn test_run_cross_mode_without_dir_b() {
    let dir = tempdir().unwrap();
    let request = RunRequest::new(dir.path()).with_mode(Mode::AVsB);

    let err = runner::run(&request, &CollectingSink::new()).unwrap_err();
    assert!(matches!(err, RunError::MissingDirB(Mode::AVsB)));
    assert!(err.is_path_invalid());
}

#[test]
fn test_run_non_recursive_ignores_nested() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("sub/b.txt"), b"same");

    let request = RunRequest::new(dir.path()).with_recursive(false);
    let sink = CollectingSink::new();
    let outcome = runner::run(&request, &sink).unwrap();

    assert!(outcome.pairs.is_empty());
    assert!(sink.lines().contains(&"Recursive: OFF".to_string()));
    assert!(dir.path().join("sub/b.txt").exists());
}

#[test]
fn test_app_exit_codes() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"1");
    let root = dir.path().to_str().unwrap();

    let code = app(&["scan", root, "--mode", "within", "--action", "move"]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);

    write(&dir.path().join("b.txt"), b"1");
    let code = app(&["scan", root, "--mode", "within", "--action", "move"]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("_duplicates").join("b.txt").exists());
}

#[test]
fn test_app_delete_with_yes() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d.txt"), b"x");

    let code = app(&[
        "scan",
        a.path().to_str().unwrap(),
        b.path().to_str().unwrap(),
        "--mode",
        "a-vs-b",
        "--action",
        "delete",
        "--yes",
    ])
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!b.path().join("d.txt").exists());
    assert!(a.path().join("k.txt").exists());
}

#[test]
fn test_app_invalid_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = app(&[
        "scan",
        missing.to_str().unwrap(),
        "--mode",
        "within",
        "--action",
        "move",
    ])
    .unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidPath);
}

#[test]
fn test_app_same_directory_is_invalid() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    let err = app(&["scan", root, root, "--mode", "a-vs-b", "--action", "move"]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidPath);
}

#[test]
fn test_app_custom_quarantine_name() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"1");
    write(&dir.path().join("b.txt"), b"1");

    let code = app(&[
        "scan",
        dir.path().to_str().unwrap(),
        "--mode",
        "within",
        "--action",
        "move",
        "--quarantine-dir",
        "held",
    ])
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("held").join("b.txt").exists());
}
