//! Record file helpers shared by every store.

use super::StoreError;
use crate::events::{EventSink, StoreEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Extension of record files.
pub(crate) const RECORD_EXTENSION: &str = "json";

/// Reject ids that cannot safely be used as a file stem.
pub(crate) fn validate_id(id: &str) -> Result<(), StoreError> {
    let unsafe_id = id.is_empty()
        || id == "."
        || id.contains("..")
        || id.contains(['/', '\\', '\0']);
    if unsafe_id {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Path of the record file for `id` inside `dir`.
pub(crate) fn record_path(dir: &Path, id: &str) -> Result<PathBuf, StoreError> {
    validate_id(id)?;
    Ok(dir.join(format!("{id}.{RECORD_EXTENSION}")))
}

/// Read and parse one record.
///
/// A missing file maps to [`StoreError::NotFound`], a malformed one to
/// [`StoreError::Parse`].
pub(crate) async fn read_record<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
    id: &str,
) -> Result<T, StoreError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a record as indented JSON and replace the file at `path`.
pub(crate) async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(record)?;
    replace_file(path, content.as_bytes()).await
}

/// Replace a file's contents.
///
/// The bytes go to a sibling temporary file first and are renamed over the
/// target, so a failed write leaves the previous file untouched.
pub(crate) async fn replace_file(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = fs::write(&tmp, contents).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

/// Parse every record file in `dir`.
///
/// Files that cannot be read or parsed are skipped and reported to `events`.
/// A missing directory yields no records.
pub(crate) async fn scan_records<T: DeserializeOwned>(
    dir: &Path,
    events: &dyn EventSink,
) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(records),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path
            .extension()
            .map(|e| e == RECORD_EXTENSION)
            .unwrap_or(false)
        {
            continue;
        }
        if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(true) {
            continue;
        }

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                events.record(&StoreEvent::RecordSkipped {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => records.push(record),
            Err(e) => events.record(&StoreEvent::RecordSkipped {
                path,
                reason: e.to_string(),
            }),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("char-123").is_ok());
        assert!(validate_id("5f0c1a7e-8d4b-4f2e-9a61-1b2c3d4e5f60").is_ok());

        for bad in ["", ".", "..", "../escape", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_id(bad), Err(StoreError::InvalidId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_record_path() {
        let path = record_path(Path::new("/data/maps"), "map-1").unwrap();
        assert_eq!(path, PathBuf::from("/data/maps/map-1.json"));
    }

    #[tokio::test]
    async fn test_replace_file_leaves_no_temp_file() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("note.json");

        replace_file(&path, b"first").await.unwrap();
        replace_file(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("note.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("note.json");
        replace_file(&path, b"kept").await.unwrap();

        // A directory squatting on the temp path makes the write fail.
        std::fs::create_dir(dir.path().join("note.json.tmp")).unwrap();
        assert!(replace_file(&path, b"lost").await.is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
    }

    #[tokio::test]
    async fn test_read_record_errors() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let missing = dir.path().join("missing.json");
        let err = read_record::<serde_json::Value>(&missing, "map", "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        let err = read_record::<serde_json::Value>(&corrupt, "map", "corrupt")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
