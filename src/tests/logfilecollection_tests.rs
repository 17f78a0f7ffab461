// src/tests/logfilecollection_tests.rs

//! tests for `logfilecollection.rs`

use crate::common::{FPath, FPaths, LogFileError, ResultS3};
use crate::data::entry::Entry;
use crate::data::source::SOURCE_FORMATS;
use crate::debug::helpers::{create_temp_dir, set_mtime, TempDir};
use crate::readers::helpers::path_to_fpath;
use crate::readers::logfile::LogFile;
use crate::readers::logfilecollection::LogFileCollection;
use crate::tests::common::{DATA_10, DATA_BAD_LINE, DATA_CONTINUATION};

use ::regex::Regex;

const DATA_A: &str = "\
Jan 1 00:00:00 hosta app[1]: a1
Jan 1 00:00:01 hosta app[1]: a2
";

const DATA_B: &str = "\
Jan 9 00:00:00 hostb app[2]: b1
Jan 9 00:00:01 hostb sshd[3]: b2
";

/// Write `data` to file `name` in `dir` with modification time `mtime`.
fn write_file(
    dir: &TempDir,
    name: &str,
    data: &str,
    mtime: i64,
) -> FPath {
    let path: FPath = path_to_fpath(&dir.path().join(name));
    std::fs::write(&path, data).unwrap();
    set_mtime(&path, mtime);

    path
}

/// Advance until `Done`, return the messages.
fn drain_messages(collection: &mut LogFileCollection) -> Vec<String> {
    let mut messages = Vec::<String>::new();
    loop {
        match collection.advance() {
            ResultS3::Found(entry) => messages.push(entry.message().to_string()),
            ResultS3::Done => break,
            ResultS3::Err(err) => panic!("advance failed {}", err),
        }
    }

    messages
}

#[test]
fn test_order_by_mtime() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 100);
    let path_b = write_file(&dir, "b.log", DATA_B, 50);
    let mut collection = LogFileCollection::new(&[path_a.clone(), path_b.clone()], &SOURCE_FORMATS).unwrap();
    assert_eq!(collection.len(), 2);
    let paths: Vec<&FPath> = collection.logfiles().iter().map(|lf| lf.path()).collect();
    assert_eq!(paths, vec![&path_b, &path_a]);

    assert_eq!(drain_messages(&mut collection), vec!["b1", "b2", "a1", "a2"]);
    assert_eq!(collection.cursor_position(), None);
}

#[test]
fn test_order_same_mtime_by_path() {
    let dir = create_temp_dir();
    let path_z = write_file(&dir, "z.log", DATA_A, 100);
    let path_m = write_file(&dir, "m.log", DATA_B, 100);
    let collection = LogFileCollection::new(&[path_z.clone(), path_m.clone()], &SOURCE_FORMATS).unwrap();
    let paths: Vec<&FPath> = collection.logfiles().iter().map(|lf| lf.path()).collect();
    assert_eq!(paths, vec![&path_m, &path_z]);
}

#[test]
fn test_advance_starts_over_after_done() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 100);
    let path_b = write_file(&dir, "b.log", DATA_B, 200);
    let mut collection = LogFileCollection::new(&[path_b, path_a], &SOURCE_FORMATS).unwrap();
    let first = drain_messages(&mut collection);
    assert_eq!(first, vec!["a1", "a2", "b1", "b2"]);
    match collection.advance() {
        ResultS3::Found(entry) => assert_eq!(entry.message(), "a1"),
        result => panic!("expected Found, got {}", result),
    }
    assert_eq!(collection.cursor_position(), Some(0));
}

#[test]
fn test_new_missing_path() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 100);
    let paths: FPaths = vec![path_a, FPath::from("/THIS/PATH/DOES/NOT/EXIST")];
    match LogFileCollection::new(&paths, &SOURCE_FORMATS) {
        Err(LogFileError::OpenFailure { path, .. }) => assert_eq!(path, "/THIS/PATH/DOES/NOT/EXIST"),
        result => panic!("expected OpenFailure, got {:?}", result),
    }
}

#[test]
fn test_empty() {
    let mut collection = LogFileCollection::new(&[], &SOURCE_FORMATS).unwrap();
    assert!(collection.is_empty());
    assert!(collection.advance().is_done());
    assert!(collection.summaries().is_empty());
}

#[test]
fn test_from_logfiles() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 300);
    let path_b = write_file(&dir, "b.log", DATA_B, 200);
    let logfiles: Vec<LogFile> = vec![
        LogFile::new(path_a, &SOURCE_FORMATS).unwrap(),
        LogFile::new(path_b, &SOURCE_FORMATS).unwrap(),
    ];
    let mut collection = LogFileCollection::from_logfiles(logfiles);
    assert_eq!(drain_messages(&mut collection), vec!["b1", "b2", "a1", "a2"]);
}

#[test]
fn test_advance_error_keeps_file() {
    let dir = create_temp_dir();
    let path_bad = write_file(&dir, "bad.log", DATA_BAD_LINE, 100);
    let path_b = write_file(&dir, "b.log", DATA_B, 200);
    let mut collection = LogFileCollection::new(&[path_b, path_bad], &SOURCE_FORMATS).unwrap();
    let mut messages = Vec::<String>::new();
    let mut errors: usize = 0;
    loop {
        match collection.advance() {
            ResultS3::Found(entry) => messages.push(entry.message().to_string()),
            ResultS3::Done => break,
            ResultS3::Err(err) => {
                assert!(err.is_line_error());
                assert_eq!(collection.cursor_position(), Some(0));
                errors += 1;
            }
        }
    }
    assert_eq!(errors, 1);
    assert_eq!(messages, vec!["one", "three", "b1", "b2"]);
}

#[test]
fn test_advance_matching() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 100);
    let path_b = write_file(&dir, "b.log", DATA_B, 200);
    let mut collection = LogFileCollection::new(&[path_a, path_b], &SOURCE_FORMATS).unwrap();
    let predicate = |entry: &Entry| entry.message().ends_with('2');
    let mut messages = Vec::<String>::new();
    while let ResultS3::Found(entry) = collection.advance_matching(Some(&predicate)) {
        messages.push(entry.message().to_string());
    }
    assert_eq!(messages, vec!["a2", "b2"]);
}

#[test]
fn test_filters() {
    let dir = create_temp_dir();
    let path_10 = write_file(&dir, "ten.log", DATA_10, 300);
    let path_b = write_file(&dir, "b.log", DATA_B, 200);
    let mut collection = LogFileCollection::new(&[path_10, path_b], &SOURCE_FORMATS).unwrap();

    let sshd: Vec<String> = collection
        .filter_program("sshd")
        .unwrap()
        .iter()
        .map(|e| e.message().to_string())
        .collect();
    assert_eq!(sshd.len(), 4);
    // file order: b.log first
    assert_eq!(sshd[0], "b2");
    assert!(sshd[1].starts_with("Server listening"));

    assert_eq!(collection.filter_host("hostb").unwrap().len(), 2);
    assert_eq!(collection.filter_host("host2").unwrap().len(), 4);

    let regex = Regex::new("b[0-9]").unwrap();
    assert_eq!(collection.filter_message(&regex).unwrap().len(), 2);

    let regex = Regex::new(r"(?P<letter>[ab])(?P<digit>[0-9])").unwrap();
    let matches = collection.match_message(&regex).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[1].get("digit").map(String::as_str), Some("2"));

    let summaries = collection.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].entries, 2);
    assert_eq!(summaries[1].entries, 10);
}

#[test]
fn test_reload() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 100);
    let mut collection = LogFileCollection::new(&[path_a], &SOURCE_FORMATS).unwrap();
    match collection.advance() {
        ResultS3::Found(entry) => assert_eq!(entry.message(), "a1"),
        result => panic!("expected Found, got {}", result),
    }
    collection.reload().unwrap();
    assert_eq!(collection.cursor_position(), None);
    assert_eq!(drain_messages(&mut collection), vec!["a1", "a2"]);
    assert_eq!(collection.load().unwrap(), 2);
}

#[test]
fn test_advance_index_entry() {
    let dir = create_temp_dir();
    let path_a = write_file(&dir, "a.log", DATA_A, 100);
    let path_c = write_file(&dir, "c.log", DATA_CONTINUATION, 200);
    let mut collection = LogFileCollection::new(&[path_c, path_a], &SOURCE_FORMATS).unwrap();
    let mut indexes = Vec::<(usize, usize)>::new();
    while let ResultS3::Found(index) = collection.advance_index(None) {
        indexes.push(index);
    }
    assert_eq!(indexes, vec![(0, 0), (0, 1), (1, 0), (1, 1), (1, 2)]);
    assert_eq!(collection.cursor_position(), None);

    // continuation lines are folded once the following entry is read
    let entry = collection.entry((1, 1)).unwrap();
    assert_eq!(entry.count_lines(), 3);
    assert!(entry.message().starts_with("Traceback"));
    assert_eq!(collection.entry((0, 1)).map(|e| e.message()), Some("a2"));
    assert!(collection.entry((1, 3)).is_none());
    assert!(collection.entry((2, 0)).is_none());
}
