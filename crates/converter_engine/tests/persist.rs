use std::fs;
use std::io::Write;

use converter_engine::{ensure_dir, read_if_exists, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state").join("nested");
    assert!(!new_dir.exists());
    ensure_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("history.ron", "[]").unwrap();
    assert_eq!(first.file_name().unwrap(), "history.ron");
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = writer.write("history.ron", "[(a)]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[(a)]");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn write_into_a_file_path_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("history.ron", "data").is_err());
    assert!(!file_path.with_file_name("history.ron").exists());
}

#[test]
fn read_if_exists_distinguishes_missing_files() {
    let temp = TempDir::new().unwrap();
    assert_eq!(read_if_exists(temp.path(), "theme.ron").unwrap(), None);

    fs::write(temp.path().join("theme.ron"), "\"dark\"").unwrap();
    assert_eq!(
        read_if_exists(temp.path(), "theme.ron").unwrap().as_deref(),
        Some("\"dark\"")
    );
}

#[test]
fn commit_unique_never_overwrites() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let mut names = Vec::new();
    for body in ["one", "two", "three"] {
        let mut tmp = writer.begin().unwrap();
        tmp.write_all(body.as_bytes()).unwrap();
        let path = writer.commit_unique(tmp, "song.mp3").unwrap();
        names.push(path.file_name().unwrap().to_string_lossy().into_owned());
    }

    assert_eq!(names, vec!["song.mp3", "song (1).mp3", "song (2).mp3"]);
    assert_eq!(
        fs::read_to_string(temp.path().join("song (1).mp3")).unwrap(),
        "two"
    );
}
