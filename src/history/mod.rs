//! Prompt/response history storage.

pub mod file;
pub mod memory;
pub mod record;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use record::HistoryRecord;
pub use traits::HistoryStore;
