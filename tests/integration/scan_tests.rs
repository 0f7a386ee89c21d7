use dupsweep::duplicates::{detect_within, DuplicateFinder, FinderConfig, FinderError};
use dupsweep::progress::{CollectingSink, NullSink};
use dupsweep::scanner::ScanTarget;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn write(path: &std::path::Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (pairs, summary) = finder
        .find_within(&ScanTarget::new(dir.path(), true), &NullSink)
        .unwrap();

    assert!(pairs.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_files, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert!(pairs.is_empty());
}

#[test]
fn test_scan_first_occurrence_is_kept() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("A.txt"), b"x");
    write(&dir.path().join("B.txt"), b"x");
    write(&dir.path().join("C.txt"), b"y");

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].original.file_name().unwrap(), "A.txt");
    assert_eq!(pairs[0].duplicate.file_name().unwrap(), "B.txt");
    assert!(pairs[0].original.is_absolute());
}

#[test]
fn test_scan_same_name_different_content_is_not_duplicate() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one/report.txt"), b"version 1");
    write(&dir.path().join("two/report.txt"), b"version 2");

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert!(pairs.is_empty());
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), b"aaaa");
    write(&dir.path().join("b.bin"), b"bbbb");

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert!(pairs.is_empty());
}

#[test]
fn test_scan_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("empty1"), b"");
    write(&dir.path().join("empty2"), b"");

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a/b/c/deep.txt"), b"nested");
    write(&dir.path().join("top.txt"), b"nested");

    let recursive = detect_within(dir.path(), true, &NullSink).unwrap();
    let flat = detect_within(dir.path(), false, &NullSink).unwrap();

    assert_eq!(recursive.len(), 1);
    assert_eq!(recursive[0].original, dir.path().join("top.txt"));
    assert!(flat.is_empty());
}

#[test]
fn test_scan_top_level_file_wins_over_nested_copy() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("A_sub/x.txt"), b"same");
    write(&dir.path().join("a.txt"), b"same");

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].original, dir.path().join("a.txt"));
    assert_eq!(pairs[0].duplicate, dir.path().join("A_sub").join("x.txt"));
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a.txt", "1"),
        ("b.txt", "1"),
        ("sub/c.txt", "1"),
        ("sub/d.txt", "2"),
        ("sub/e.txt", "2"),
    ] {
        write(&dir.path().join(name), content.as_bytes());
    }

    let first = detect_within(dir.path(), true, &NullSink).unwrap();
    let second = detect_within(dir.path(), true, &NullSink).unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_scan_large_file_spanning_chunks() {
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..3 * 1024 * 1024 + 17).map(|i| (i % 251) as u8).collect();
    write(&dir.path().join("big1.bin"), &data);
    write(&dir.path().join("big2.bin"), &data);
    let mut altered = data.clone();
    let last = altered.len() - 1;
    altered[last] ^= 0xFF;
    write(&dir.path().join("big3.bin"), &altered);

    let pairs = detect_within(dir.path(), true, &NullSink).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].duplicate.file_name().unwrap(), "big2.bin");
}

#[test]
fn test_scan_progress_every_fifty_files() {
    let dir = tempdir().unwrap();
    for i in 0..120 {
        write(&dir.path().join(format!("f{:03}.txt", i)), format!("{}", i).as_bytes());
    }

    let sink = CollectingSink::new();
    DuplicateFinder::new(FinderConfig::default())
        .find_within(&ScanTarget::new(dir.path(), true), &sink)
        .unwrap();

    let ticks: Vec<_> = sink
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("Progress:"))
        .collect();
    assert_eq!(ticks, vec!["Progress: 50/120", "Progress: 100/120"]);
}

#[test]
fn test_scan_nonexistent_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = detect_within(&missing, true, &NullSink).unwrap_err();

    assert!(matches!(err, FinderError::PathNotFound(_)));
    assert!(err.is_path_invalid());
    assert!(!missing.exists());
}
