//! In-memory history backend for testing.

use crate::config::DEFAULT_MAX_HISTORY;
use crate::error::Result;
use crate::history::record::{HistoryRecord, push_capped};
use crate::history::traits::HistoryStore;
use std::sync::{PoisonError, RwLock};

/// In-memory history backend for testing.
#[derive(Debug)]
pub struct MemoryBackend {
    records: RwLock<Vec<HistoryRecord>>,
    max_entries: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }
}

impl MemoryBackend {
    /// Create a new in-memory backend with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend keeping at most `max_entries` records.
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_entries,
        }
    }
}

impl HistoryStore for MemoryBackend {
    fn list(&self) -> Result<Vec<HistoryRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.clone())
    }

    fn add(&self, prompt: &str, content: &str) -> Result<HistoryRecord> {
        let record = HistoryRecord::new(prompt, content);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        push_capped(&mut records, record.clone(), self.max_entries);
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    fn clear(&self) -> Result<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_empty() {
        let store = MemoryBackend::new();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn add_puts_newest_first() {
        let store = MemoryBackend::new();
        store.add("first", "a").unwrap();
        let second = store.add("second", "b").unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], second);
        assert_eq!(records[1].prompt, "first");
    }

    #[test]
    fn add_at_capacity_evicts_exactly_the_oldest() {
        let store = MemoryBackend::with_capacity(3);
        let oldest = store.add("p0", "c").unwrap();
        store.add("p1", "c").unwrap();
        store.add("p2", "c").unwrap();

        let newest = store.add("p3", "c").unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, newest.id);
        assert!(records.iter().all(|r| r.id != oldest.id));
        assert_eq!(records[2].prompt, "p1");
    }

    #[test]
    fn get_by_id() {
        let store = MemoryBackend::new();
        let record = store.add("prompt", "content").unwrap();
        assert_eq!(store.get(&record.id).unwrap(), Some(record));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn delete_removes_record() {
        let store = MemoryBackend::new();
        let keep = store.add("keep", "c").unwrap();
        let removed = store.add("drop", "c").unwrap();

        assert!(store.delete(&removed.id).unwrap());
        assert_eq!(store.list().unwrap(), vec![keep]);
    }

    #[test]
    fn delete_nonexistent_is_noop() {
        let store = MemoryBackend::new();
        store.add("keep", "c").unwrap();

        assert!(!store.delete("nonexistent").unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn clear_empties() {
        let store = MemoryBackend::new();
        store.add("a", "c").unwrap();
        store.add("b", "c").unwrap();

        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn concurrent_adds_respect_capacity() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryBackend::with_capacity(25));

        let mut handles = vec![];
        for i in 0..10 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for j in 0..10 {
                    store_clone.add(&format!("p-{i}-{j}"), "c").unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(store.list().unwrap().len(), 25);
    }
}
