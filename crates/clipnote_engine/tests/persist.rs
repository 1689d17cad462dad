use std::fs;

use clipnote_engine::{ensure_state_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(".clipnote_state.ron", "(tasks: [])").unwrap();
    assert_eq!(first.file_name().unwrap(), ".clipnote_state.ron");
    assert_eq!(fs::read_to_string(&first).unwrap(), "(tasks: [])");

    let second = writer.write(".clipnote_state.ron", "(tasks: [1])").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "(tasks: [1])");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("snapshot.ron", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("snapshot.ron").exists());
}
