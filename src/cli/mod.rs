//! CLI command implementations.

pub mod export;
pub mod generate;
pub mod history;
pub mod templates;

use crate::config::Config;
use crate::error::Result;
use crate::history::FileBackend;

/// Open the history file configured in `config`.
fn open_store(config: &Config) -> Result<FileBackend> {
    FileBackend::new(&config.storage.path, config.history.max_entries)
}
