//! Directory listing: immediate entries of one directory whose file name fully matches the pattern.

use log::warn;
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

use crate::CandidatePath;
use crate::error::{Result, ScanError};

/// File-name pattern, anchored at both ends.
#[derive(Clone, Debug)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ScanError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

/// List candidate files directly under `dir` (non-recursive), in listing order.
///
/// A missing, non-directory, or unreadable `dir` is [`ScanError::DirectoryUnavailable`].
/// Individual entries that cannot be read are skipped with a warning. Entries are not
/// filtered by type; a matching subdirectory becomes a candidate and fails when scanned.
pub fn list_candidates(dir: &Path, pattern: &FilePattern) -> Result<Vec<CandidatePath>> {
    let unavailable = |message: String| ScanError::DirectoryUnavailable {
        dir: dir.to_path_buf(),
        message,
    };
    let meta = std::fs::metadata(dir).map_err(|e| unavailable(e.to_string()))?;
    if !meta.is_dir() {
        return Err(unavailable("not a directory".to_string()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        match entry {
            Ok(entry) => {
                let matched = pattern.is_match(&entry.file_name().to_string_lossy());
                if matched {
                    candidates.push(CandidatePath {
                        path: entry.into_path(),
                        source_dir: dir.to_path_buf(),
                    });
                }
            }
            // The root itself could not be opened: treat the whole directory as unavailable.
            Err(err) if err.depth() == 0 => return Err(unavailable(err.to_string())),
            Err(err) => warn!("Skipping unreadable entry in {}: {}", dir.display(), err),
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(c: &[CandidatePath]) -> Vec<String> {
        let mut v: Vec<String> = c
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn test_pattern_is_fully_anchored() {
        let p = FilePattern::new(r".*\.log").unwrap();
        assert!(p.is_match("app.log"));
        assert!(!p.is_match("app.log.1"));
        assert!(!p.is_match("app.txt"));
        let p = FilePattern::new(r"app|other").unwrap();
        assert!(p.is_match("app"));
        assert!(!p.is_match("app2"));
        assert!(!p.is_match("xother"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            FilePattern::new("[unclosed"),
            Err(ScanError::Pattern { .. })
        ));
    }

    #[test]
    fn test_lists_matching_files_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "x").unwrap();
        fs::write(dir.path().join("b.log"), "x").unwrap();
        fs::write(dir.path().join("c.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.log"), "x").unwrap();

        let p = FilePattern::new(r".*\.log").unwrap();
        let got = list_candidates(dir.path(), &p).unwrap();
        assert_eq!(names(&got), vec!["a.log", "b.log"]);
        assert!(got.iter().all(|c| c.source_dir == dir.path()));
    }

    #[test]
    fn test_matches_name_not_full_path() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        fs::write(logs.join("plain"), "x").unwrap();
        let p = FilePattern::new(r".*logs.*").unwrap();
        assert!(list_candidates(&logs, &p).unwrap().is_empty());
    }

    #[test]
    fn test_missing_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let p = FilePattern::new(r".*").unwrap();
        let err = list_candidates(&dir.path().join("gone"), &p).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryUnavailable { .. }));
    }

    #[test]
    fn test_file_as_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("f.log");
        fs::write(&f, "x").unwrap();
        let p = FilePattern::new(r".*").unwrap();
        assert!(matches!(
            list_candidates(&f, &p),
            Err(ScanError::DirectoryUnavailable { .. })
        ));
    }
}
