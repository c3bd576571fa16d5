use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::issue::IssueList;

/// Error type for loading and saving the issue collection
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize issues: {0}")]
    SerializeError(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct DataFile {
    #[serde(default)]
    issues: IssueList,
}

#[derive(Serialize)]
struct DataFileRef<'a> {
    issues: &'a IssueList,
}

/// Load the collection from `path`. A missing file is an empty collection.
///
/// Duplicate issues, duplicate solutions and multiple primaries in the
/// file are rejected.
pub fn load_issues(path: &Path) -> Result<IssueList, StorageError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no data file, starting empty");
            return Ok(IssueList::new());
        }
        Err(e) => {
            return Err(StorageError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let data: DataFile = serde_json::from_str(&text).map_err(|e| StorageError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), issues = data.issues.len(), "loaded");
    Ok(data.issues)
}

/// Save the collection to `path`, replacing the previous file atomically.
pub fn save_issues(path: &Path, issues: &IssueList) -> Result<(), StorageError> {
    let mut json = serde_json::to_string_pretty(&DataFileRef { issues })?;
    json.push('\n');
    atomic_write(path, json.as_bytes()).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "save failed");
        StorageError::WriteError {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    tracing::info!(path = %path.display(), issues = issues.len(), "saved");
    Ok(())
}

/// Write `content` to a temp file next to `path` and rename it into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::model::issue::Issue;
    use crate::model::solution::Solution;

    fn sample() -> IssueList {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut solutions = crate::model::UniqueList::new();
        solutions
            .add(Solution::new("https://example.com/fix", "works").unwrap().with_primary(true))
            .unwrap();
        let issue = Issue::new("NPE in loop", "trace", ["java"], now)
            .unwrap()
            .with_solutions(solutions, now)
            .unwrap();
        let mut list = IssueList::new();
        list.add(issue).unwrap();
        list.add(Issue::new("Segfault", "", Vec::<String>::new(), now).unwrap())
            .unwrap();
        list
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let issues = load_issues(&tmp.path().join("nope.json")).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/issues.json");
        let issues = sample();
        save_issues(&path, &issues).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"issues\": ["));
        assert_eq!(load_issues(&path).unwrap(), issues);
    }

    #[test]
    fn duplicate_issues_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("issues.json");
        let issues = sample();
        let one = serde_json::to_value(&issues.as_slice()[1]).unwrap();
        let doc = serde_json::json!({ "issues": [one.clone(), one] });
        fs::write(&path, doc.to_string()).unwrap();
        assert!(matches!(load_issues(&path), Err(StorageError::ParseError { .. })));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("issues.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_issues(&path), Err(StorageError::ParseError { .. })));
    }

    #[test]
    fn atomic_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.txt");
        atomic_write(&path, b"hello").unwrap();
        atomic_write(&path, b"goodbye").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "goodbye");
    }
}
