//! File-based history backend.

use crate::error::Result;
use crate::history::record::{HistoryRecord, push_capped};
use crate::history::traits::HistoryStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Name of the history file under the base directory.
const HISTORY_FILE: &str = "history.json";

/// Single JSON-array file with atomic writes.
///
/// A missing, corrupted or wrong-shape file reads as an empty history.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    max_entries: usize,
    // Serializes read-modify-write cycles within the process
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Create a new file backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: &Path, max_entries: usize) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join(HISTORY_FILE),
            max_entries,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<HistoryRecord>>(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                log::warn!(
                    "ignoring unreadable history file {}: {e}",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        let temp = self.path.with_extension("tmp");

        let contents = serde_json::to_string_pretty(records)?;
        fs::write(&temp, &contents)?;

        // Atomic rename - a crash mid-write leaves the previous file intact
        fs::rename(&temp, &self.path)?;

        Ok(())
    }
}

impl HistoryStore for FileBackend {
    fn list(&self) -> Result<Vec<HistoryRecord>> {
        self.load()
    }

    fn add(&self, prompt: &str, content: &str) -> Result<HistoryRecord> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load()?;
        let record = HistoryRecord::new(prompt, content);
        push_capped(&mut records, record.clone(), self.max_entries);
        self.save(&records)?;
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.save(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_backend(max_entries: usize) -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path(), max_entries).unwrap();
        (backend, temp_dir)
    }

    #[test]
    fn creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let _backend = FileBackend::new(&nested, 5).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn missing_file_lists_empty() {
        let (store, _temp) = create_test_backend(5);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn add_persists_across_instances() {
        let (store, temp) = create_test_backend(5);
        let record = store.add("prompt", "infographic chart-wordcloud").unwrap();

        let reopened = FileBackend::new(temp.path(), 5).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![record]);
    }

    #[test]
    fn add_at_capacity_evicts_oldest() {
        let (store, _temp) = create_test_backend(2);
        let oldest = store.add("p0", "c").unwrap();
        let middle = store.add("p1", "c").unwrap();
        let newest = store.add("p2", "c").unwrap();

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newest.id, middle.id]);
        assert!(!ids.contains(&oldest.id));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let (store, temp) = create_test_backend(5);
        store.add("p", "c").unwrap();

        assert!(temp.path().join("history.json").exists());
        assert!(!temp.path().join("history.tmp").exists());
    }

    #[test]
    fn delete_and_clear() {
        let (store, _temp) = create_test_backend(5);
        let a = store.add("a", "c").unwrap();
        store.add("b", "c").unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert!(!store.delete(&a.id).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);

        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn delete_on_missing_file_is_noop() {
        let (store, temp) = create_test_backend(5);
        assert!(!store.delete("nonexistent").unwrap());
        assert!(!temp.path().join("history.json").exists());
    }

    #[test]
    fn corrupted_file_reads_as_empty() {
        let (store, temp) = create_test_backend(5);
        fs::write(temp.path().join("history.json"), "{ not json").unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_reads_as_empty() {
        let (store, temp) = create_test_backend(5);
        fs::write(temp.path().join("history.json"), r#"{"id": "x"}"#).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn add_after_corruption_starts_fresh() {
        let (store, temp) = create_test_backend(5);
        fs::write(temp.path().join("history.json"), "garbage").unwrap();

        let record = store.add("p", "c").unwrap();
        assert_eq!(store.list().unwrap(), vec![record]);
    }

    #[test]
    fn reads_records_written_by_hand() {
        let (store, temp) = create_test_backend(5);
        fs::write(
            temp.path().join("history.json"),
            r#"[{"id":"1700000000000","prompt":"p","content":"c","timestamp":1700000000000}]"#,
        )
        .unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1700000000000");
        assert_eq!(store.get("1700000000000").unwrap().unwrap().prompt, "p");
    }
}
