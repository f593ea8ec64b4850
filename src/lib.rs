//! infogen - Turn free-form text into infographics with a chat model.
//!
//! The model replies in a small indentation-based syntax, streamed over
//! server-sent events. Replies are decoded incrementally, rendered to SVG and
//! kept in a capped local history.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod generate;
pub mod history;
pub mod prompt;
pub mod render;
pub mod stream;
pub mod template;

pub use client::ChatClient;
pub use config::Config;
pub use error::{Error, Result};
pub use generate::{GenerateRequest, Generation, Generator};
pub use history::{HistoryRecord, HistoryStore};
pub use stream::{StreamDecoder, StreamEvent};
