use dupsweep::actions::{relocate, relocate_to};
use dupsweep::duplicates::{detect_between, detect_within};
use dupsweep::progress::CollectingSink;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_relocate_within_detection() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("A.txt"), b"x");
    write(&dir.path().join("B.txt"), b"x");
    write(&dir.path().join("C.txt"), b"y");

    let sink = CollectingSink::new();
    let pairs = detect_within(dir.path(), true, &sink).unwrap();
    let result = relocate(&pairs, dir.path(), &sink).unwrap();

    assert_eq!(result.success_count(), 1);
    assert!(dir.path().join("A.txt").exists());
    assert!(dir.path().join("C.txt").exists());
    assert!(!dir.path().join("B.txt").exists());
    assert_eq!(
        fs::read(dir.path().join("_duplicates").join("B.txt")).unwrap(),
        b"x"
    );
}

#[test]
fn test_relocate_collision_gets_counter() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d1.txt"), b"x");
    write(&b.path().join("_duplicates").join("d1.txt"), b"previous run");

    let sink = CollectingSink::new();
    let pairs = detect_between(a.path(), b.path(), false, &sink).unwrap();
    let result = relocate(&pairs, b.path(), &sink).unwrap();

    assert!(result.all_succeeded());
    let quarantine = b.path().join("_duplicates");
    assert_eq!(fs::read(quarantine.join("d1.txt")).unwrap(), b"previous run");
    assert_eq!(fs::read(quarantine.join("d1(1).txt")).unwrap(), b"x");
    assert!(a.path().join("k.txt").exists());
}

#[test]
fn test_relocate_rerun_finds_quarantined_copies() {
    // Quarantined copies are rescanned, but the top-level original stays kept
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"z");
    write(&dir.path().join("b.txt"), b"z");

    let sink = CollectingSink::new();
    let pairs = detect_within(dir.path(), true, &sink).unwrap();
    relocate(&pairs, dir.path(), &sink).unwrap();

    let again = detect_within(dir.path(), true, &sink).unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].original, dir.path().join("a.txt"));
    assert_eq!(again[0].duplicate, dir.path().join("_duplicates").join("b.txt"));

    relocate(&again, dir.path(), &sink).unwrap();
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"z");
    assert!(dir.path().join("_duplicates").join("b(1).txt").exists());
}

#[test]
fn test_relocate_reports_each_move() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        write(&dir.path().join(name), b"same");
    }

    let sink = CollectingSink::new();
    let pairs = detect_within(dir.path(), true, &sink).unwrap();
    let detect_lines = sink.lines().len();
    relocate_to(&pairs, dir.path(), "held", &sink).unwrap();

    let lines = sink.lines();
    let moves: Vec<_> = lines[detect_lines..]
        .iter()
        .filter(|l| l.starts_with("[MOVE] "))
        .collect();
    assert_eq!(moves.len(), 2);
    assert!(lines
        .last()
        .unwrap()
        .starts_with("Moved 2 duplicate files to: "));
    assert!(dir.path().join("held").join("b.txt").exists());
    assert!(dir.path().join("held").join("c.txt").exists());
}
