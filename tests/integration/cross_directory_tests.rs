use dupsweep::duplicates::{detect_between, FinderError};
use dupsweep::progress::{CollectingSink, NullSink};
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
fn test_a_vs_b_single_match() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d1.txt"), b"x");
    write(&b.path().join("d2.txt"), b"y");

    let pairs = detect_between(a.path(), b.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].original.file_name().unwrap(), "k.txt");
    assert_eq!(pairs[0].duplicate.file_name().unwrap(), "d1.txt");
}

#[test]
fn test_b_vs_a_swaps_roles() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d1.txt"), b"x");

    let pairs = detect_between(b.path(), a.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].original.file_name().unwrap(), "d1.txt");
    assert_eq!(pairs[0].duplicate.file_name().unwrap(), "k.txt");
}

#[test]
fn test_keep_side_internal_duplicates_not_reported() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k1.txt"), b"same");
    write(&a.path().join("k2.txt"), b"same");
    write(&b.path().join("other.txt"), b"other");

    let pairs = detect_between(a.path(), b.path(), true, &NullSink).unwrap();

    assert!(pairs.is_empty());
}

#[test]
fn test_first_keep_file_is_representative() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("a1.txt"), b"same");
    write(&a.path().join("a2.txt"), b"same");
    write(&b.path().join("copy.txt"), b"same");

    let pairs = detect_between(a.path(), b.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].original.file_name().unwrap(), "a1.txt");
}

#[test]
fn test_non_recursive_applies_to_both_sides() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("nested/k.txt"), b"x");
    write(&a.path().join("top.txt"), b"y");
    write(&b.path().join("d.txt"), b"x");
    write(&b.path().join("nested/e.txt"), b"y");

    let flat = detect_between(a.path(), b.path(), false, &NullSink).unwrap();
    let deep = detect_between(a.path(), b.path(), true, &NullSink).unwrap();

    assert!(flat.is_empty());
    assert_eq!(deep.len(), 2);
}

#[test]
fn test_missing_remove_root_is_rejected_before_indexing() {
    let a = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    let missing = a.path().join("missing");

    let sink = CollectingSink::new();
    let err = detect_between(a.path(), &missing, true, &sink).unwrap_err();

    assert!(matches!(err, FinderError::PathNotFound(_)));
    assert!(sink.lines().is_empty());
}

#[test]
fn test_same_directory_is_rejected() {
    let a = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");

    let err = detect_between(a.path(), a.path(), true, &NullSink).unwrap_err();

    assert!(matches!(err, FinderError::SameDirectory(_)));
}

#[test]
fn test_index_and_scan_banners() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("k.txt"), b"x");
    write(&b.path().join("d.txt"), b"x");

    let sink = CollectingSink::new();
    detect_between(a.path(), b.path(), true, &sink).unwrap();
    let lines = sink.lines();

    let index_at = lines
        .iter()
        .position(|l| l.starts_with("Indexing 1 files in: "))
        .unwrap();
    let scan_at = lines
        .iter()
        .position(|l| l == "Scanning 1 files in:")
        .unwrap();
    assert!(index_at < scan_at);
    assert!(lines.iter().any(|l| l.starts_with("[DUP] ")));
    assert!(lines.iter().any(|l| l.starts_with("  -> same as ")));
    assert_eq!(lines.last().unwrap(), "Done. Cross-dir duplicates found: 1");
}
