use std::fs;

use unblur_engine::{ResultWriter, SaveError};

#[test]
fn saves_bytes_and_replaces_existing_result() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results");
    let writer = ResultWriter::new(&out);

    let path = writer.save("restored_cat.png", b"first").unwrap();
    assert_eq!(path, out.join("restored_cat.png"));
    assert_eq!(fs::read(&path).unwrap(), b"first");

    writer.save("restored_cat.png", b"second").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"second");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[test]
fn output_path_that_is_a_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    fs::write(&file, b"x").unwrap();

    let err = ResultWriter::new(&file).save("restored_cat.png", b"png").unwrap_err();
    assert!(matches!(err, SaveError::NotADirectory(path) if path == file));
    assert_eq!(fs::read(&file).unwrap(), b"x");
}

#[test]
fn names_with_separators_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ResultWriter::new(dir.path().join("out"));

    let err = writer.save("../restored_cat.png", b"png").unwrap_err();
    assert!(matches!(err, SaveError::InvalidName(_)));
    assert!(!dir.path().join("restored_cat.png").exists());
    assert!(!dir.path().join("out").exists());
}
