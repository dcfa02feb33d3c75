use logsift::pipeline::{FilePattern, decode_line, failure_counts};
use logsift::sink::{temp_path_for, write_identifiers_csv};
use logsift::{FileErrorKind, FileOutcome, IdentifierExtractor, IdentifierSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

// --- IdentifierExtractor ---

#[test]
fn test_extract_counts_per_rule() {
    let ex = IdentifierExtractor::default();
    assert_eq!(ex.extract("userCode=A").len(), 1);
    assert_eq!(ex.extract(r#""userId":"B""#).len(), 1);
    assert_eq!(ex.extract(r#"userCode=A "userId":"B""#).len(), 2);
    assert_eq!(ex.extract("userId=B").len(), 0);
}

#[test]
fn test_extract_unicode_word_chars() {
    let ex = IdentifierExtractor::default();
    assert_eq!(ex.extract("userCode=jos\u{e9}_1!"), vec!["jos\u{e9}_1"]);
}

#[test]
fn test_extract_after_lossy_decode() {
    let ex = IdentifierExtractor::default();
    let line = decode_line(b"\xfe\xffuserCode=RAW9\x80 tail");
    assert_eq!(ex.extract(&line), vec!["RAW9"]);
}

// --- IdentifierSet ---

#[test]
fn test_set_dedups() {
    let set = IdentifierSet::new();
    assert!(set.insert("a"));
    assert!(!set.insert("a"));
    set.extend(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(set.to_sorted_vec(), vec!["a", "b"]);
}

#[test]
fn test_set_concurrent_writers() {
    let set = Arc::new(IdentifierSet::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let set = Arc::clone(&set);
            thread::spawn(move || {
                for i in 0..1000 {
                    set.insert(format!("id{}", i));
                    set.insert(format!("t{t}-{i}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(set.len(), 1000 + 8 * 1000);
}

// --- FilePattern ---

#[test]
fn test_file_pattern_default_log() {
    let p = FilePattern::new(r".*\.log").unwrap();
    assert!(p.is_match("server.log"));
    assert!(p.is_match(".log"));
    assert!(!p.is_match("server.log.gz"));
    assert!(!p.is_match("serverlog"));
}

// --- outcomes ---

#[test]
fn test_outcome_accessors() {
    let ok = FileOutcome::Success {
        path: PathBuf::from("a.log"),
        lines_processed: 3,
    };
    assert!(ok.is_success());
    assert_eq!(ok.error_kind(), None);
    assert_eq!(ok.path(), Path::new("a.log"));

    let bad = FileOutcome::Failure {
        path: PathBuf::from("b.log"),
        kind: FileErrorKind::PermissionDenied,
        message: "denied".into(),
    };
    assert!(!bad.is_success());
    assert_eq!(bad.error_kind(), Some(FileErrorKind::PermissionDenied));
    assert_eq!(
        failure_counts(&[ok, bad]).get("permission_denied"),
        Some(&1)
    );
}

#[test]
fn test_error_kind_from_io() {
    use std::io::{Error, ErrorKind};
    assert_eq!(
        FileErrorKind::from(&Error::from(ErrorKind::NotFound)),
        FileErrorKind::NotFound
    );
    assert_eq!(
        FileErrorKind::from(&Error::from(ErrorKind::PermissionDenied)),
        FileErrorKind::PermissionDenied
    );
    assert_eq!(
        FileErrorKind::from(&Error::from(ErrorKind::UnexpectedEof)),
        FileErrorKind::Read
    );
}

// --- sink ---

#[test]
fn test_csv_round_trip_rows() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ids.csv");
    let n = write_identifiers_csv(["one", "two", "three"], &out).unwrap();
    assert_eq!(n, 3);
    let mut rdr = csv::Reader::from_path(&out).unwrap();
    assert_eq!(rdr.headers().unwrap().iter().collect::<Vec<_>>(), vec!["userIdentifier"]);
    let rows: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect();
    assert_eq!(rows, vec!["one", "two", "three"]);
    assert!(!temp_path_for(&out).exists());
}
