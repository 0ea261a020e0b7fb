//! Tests for SnapshotFile
//!
//! These tests verify:
//! - Missing files load as "no snapshot"
//! - Save then load restores the key space
//! - Saves replace previous content and leave no temporary file
//! - Read errors are distinguished from absence

use std::fs;

use kcvstore::snapshot::{encode, SnapshotFile};
use kcvstore::store::KeySpace;
use kcvstore::KcvError;
use tempfile::TempDir;

type StringKeySpace = KeySpace<String, String, String>;

// =============================================================================
// Helper Functions
// =============================================================================

fn keyspace_with(key: &str, columns: &[(&str, &str)]) -> StringKeySpace {
    let mut keyspace = KeySpace::new();
    let index = keyspace.entry(key.to_string()).or_default();
    for (column, value) in columns {
        index.insert_or_update(column.to_string(), value.to_string());
    }
    keyspace
}

fn save(file: &SnapshotFile, keyspace: &StringKeySpace) -> kcvstore::Result<()> {
    file.write_bytes(&encode(keyspace)?)
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_missing_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(temp_dir.path().join("missing.kcv"), false);

    let loaded = file.load::<String, String, String>().unwrap();

    assert!(loaded.is_none());
}

#[test]
fn test_load_directory_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(temp_dir.path(), false);

    let result = file.load::<String, String, String>();

    assert!(matches!(result, Err(KcvError::Io(_))));
}

#[test]
fn test_load_garbage_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("garbage.kcv");
    fs::write(&path, b"KCVS but not really").unwrap();

    let result = SnapshotFile::new(&path, false).load::<String, String, String>();

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(temp_dir.path().join("store.kcv"), true);
    let keyspace = keyspace_with("a", &[("aa", "x"), ("ab", "y")]);

    save(&file, &keyspace).unwrap();
    let loaded: StringKeySpace = file.load().unwrap().unwrap();

    assert_eq!(loaded, keyspace);
}

#[test]
fn test_save_replaces_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(temp_dir.path().join("store.kcv"), false);

    save(&file, &keyspace_with("old", &[("c", "v")])).unwrap();
    save(&file, &keyspace_with("new", &[("c", "v")])).unwrap();

    let loaded: StringKeySpace = file.load().unwrap().unwrap();
    assert!(loaded.contains_key("new"));
    assert!(!loaded.contains_key("old"));
}

#[test]
fn test_save_leaves_no_temporary_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(temp_dir.path().join("store.kcv"), false);

    save(&file, &keyspace_with("a", &[("aa", "x")])).unwrap();

    let names: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["store.kcv"]);
}

#[test]
fn test_failed_save_keeps_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.kcv");
    let file = SnapshotFile::new(&path, false);
    save(&file, &keyspace_with("kept", &[("c", "v")])).unwrap();

    // A directory squatting on the temporary path makes the next save fail
    fs::create_dir(temp_dir.path().join("store.kcv.tmp")).unwrap();
    let result = save(&file, &keyspace_with("lost", &[("c", "v")]));
    assert!(matches!(result, Err(KcvError::Io(_))));

    let loaded: StringKeySpace = file.load().unwrap().unwrap();
    assert!(loaded.contains_key("kept"));
}

#[test]
fn test_accessors() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.kcv");

    let file = SnapshotFile::new(&path, true);

    assert_eq!(file.path(), path.as_path());
}
