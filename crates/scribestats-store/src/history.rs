//! The append-only log store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use scribestats_core::HistoryEntry;

use crate::error::StoreError;

/// File-backed store of named append-only history logs.
///
/// One JSON array file per log name. Appends are read-modify-write of the
/// whole file with no locking: two overlapping refreshes can race and one
/// append can be lost (last write wins). Known limitation, acceptable for a
/// single user's local trend log — not remedied here.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Open (and create if needed) the store directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn log_path(&self, log: &str) -> PathBuf {
        self.dir.join(format!("{log}.json"))
    }

    /// Read a log's full entry sequence; a missing file is an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on read failure, [`StoreError::Json`] when
    /// the file exists but is not a valid entry array.
    pub fn read(&self, log: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        match fs::read_to_string(self.log_path(log)) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Append one timestamped entry. Existing entries are never rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Json`] when the current
    /// log cannot be read back or written.
    pub fn append(&self, log: &str, data: serde_json::Value) -> Result<(), StoreError> {
        let mut entries = self.read(log)?;
        entries.push(HistoryEntry {
            timestamp: Utc::now(),
            data,
        });
        tracing::debug!(log, total = entries.len(), "appending history entry");
        self.write(log, &entries)
    }

    /// The raw entry sequence, for serialization to a portable file.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`HistoryStore::read`].
    pub fn export_all(&self, log: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        self.read(log)
    }

    /// Replace a log wholesale from a previously-exported JSON payload.
    ///
    /// The payload must deserialize as a sequence of `{timestamp, data}`
    /// entries; any other shape is rejected as a format error before
    /// anything is written, leaving existing history untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidImport`] for malformed payloads,
    /// [`StoreError::Io`] when the validated sequence cannot be written.
    pub fn import_all(&self, log: &str, raw: &str) -> Result<usize, StoreError> {
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(raw).map_err(|err| StoreError::InvalidImport {
                reason: err.to_string(),
            })?;
        self.write(log, &entries)?;
        tracing::info!(log, count = entries.len(), "imported history log");
        Ok(entries.len())
    }

    pub(crate) fn write(&self, log: &str, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(self.log_path(log), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_log_reads_as_empty() {
        let (_dir, store) = temp_store();
        assert!(store.read("personal_stats").unwrap().is_empty());
    }

    #[test]
    fn append_preserves_prior_entries_in_order() {
        let (_dir, store) = temp_store();
        store.append("personal_stats", json!({"totalViews": 10})).unwrap();
        store.append("personal_stats", json!({"totalViews": 25})).unwrap();

        let entries = store.read("personal_stats").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].data["totalViews"], 10);
        assert_eq!(entries[1].data["totalViews"], 25);
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[test]
    fn export_import_round_trips() {
        let (_dir, store) = temp_store();
        store.append("personal_stats", json!({"followerCount": 100})).unwrap();
        store.append("personal_stats", json!({"followerCount": 120})).unwrap();

        let exported = store.export_all("personal_stats").unwrap();
        let raw = serde_json::to_string(&exported).unwrap();

        let count = store.import_all("personal_stats", &raw).unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.read("personal_stats").unwrap(), exported);
    }

    #[test]
    fn non_array_import_is_rejected_and_history_untouched() {
        let (_dir, store) = temp_store();
        store.append("personal_stats", json!({"totalViews": 10})).unwrap();
        let before = store.read("personal_stats").unwrap();

        let result = store.import_all("personal_stats", r#"{"not": "an array"}"#);
        assert!(matches!(result, Err(StoreError::InvalidImport { .. })));
        assert_eq!(store.read("personal_stats").unwrap(), before);
    }

    #[test]
    fn malformed_entry_shape_is_rejected() {
        let (_dir, store) = temp_store();
        let result = store.import_all("personal_stats", r#"[{"no_timestamp": true}]"#);
        assert!(matches!(result, Err(StoreError::InvalidImport { .. })));
        assert!(store.read("personal_stats").unwrap().is_empty());
    }

    #[test]
    fn logs_are_isolated_by_name() {
        let (_dir, store) = temp_store();
        store.append("tag_trends", json!({"tag": "rust"})).unwrap();
        assert!(store.read("personal_stats").unwrap().is_empty());
        assert_eq!(store.read("tag_trends").unwrap().len(), 1);
    }
}
