use dupsweep::actions::delete;
use dupsweep::duplicates::{detect_between, detect_within, DuplicatePair};
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
fn test_delete_removes_only_duplicates() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("sub/b.txt"), b"same");
    write(&dir.path().join("sub/c.txt"), b"same");
    write(&dir.path().join("d.txt"), b"unique");

    let sink = CollectingSink::new();
    let pairs = detect_within(dir.path(), true, &sink).unwrap();
    let result = delete(&pairs, &sink);

    assert_eq!(result.success_count(), 2);
    for pair in &pairs {
        assert!(!pair.duplicate.exists());
        assert_eq!(fs::read(&pair.original).unwrap(), b"same");
    }
    assert!(dir.path().join("d.txt").exists());
    assert!(!dir.path().join("_duplicates").exists());
}

#[test]
fn test_delete_cross_directory() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d1.txt"), b"x");
    write(&b.path().join("d2.txt"), b"y");

    let sink = CollectingSink::new();
    let pairs = detect_between(a.path(), b.path(), true, &sink).unwrap();
    let result = delete(&pairs, &sink);

    assert_eq!(result.success_count(), 1);
    assert!(a.path().join("k.txt").exists());
    assert!(!b.path().join("d1.txt").exists());
    assert!(b.path().join("d2.txt").exists());
}

#[test]
fn test_delete_vanished_file_is_reported() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"q");
    write(&dir.path().join("b.txt"), b"q");

    let sink = CollectingSink::new();
    let pairs = detect_within(dir.path(), true, &sink).unwrap();
    fs::remove_file(&pairs[0].duplicate).unwrap();
    let result = delete(&pairs, &sink);

    assert_eq!(result.success_count(), 0);
    assert_eq!(result.failure_count(), 1);
    let expected = format!("[ERR] deleting {}", pairs[0].duplicate.display());
    assert!(sink.contains_prefix(&expected));
}

#[test]
fn test_delete_never_touches_original_even_if_listed_twice() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("keep.txt");
    let dup = dir.path().join("dup.txt");
    write(&original, b"w");
    write(&dup, b"w");

    let pairs = vec![
        DuplicatePair::new(&original, &dup),
        DuplicatePair::new(&original, &dup),
    ];
    let result = delete(&pairs, &CollectingSink::new());

    assert_eq!(result.success_count(), 1);
    assert_eq!(result.failure_count(), 1);
    assert!(original.exists());
}
