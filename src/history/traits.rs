//! History repository trait.

use crate::error::Result;
use crate::history::record::HistoryRecord;

/// Persisted prompt/response history, newest first and capped.
pub trait HistoryStore: Send + Sync {
    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn list(&self) -> Result<Vec<HistoryRecord>>;

    /// Get a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, id: &str) -> Result<Option<HistoryRecord>> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Record a completed generation, evicting the oldest record if full.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn add(&self, prompt: &str, content: &str) -> Result<HistoryRecord>;

    /// Delete a record. Returns whether it existed; unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Remove every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn clear(&self) -> Result<()>;
}
