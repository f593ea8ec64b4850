//! Streaming response decoding.
//!
//! Chat-completion streams arrive as Server-Sent Events: newline-delimited
//! `data: <json>` lines separated by blank lines and terminated by
//! `data: [DONE]`. Transport chunks are not aligned to lines, so the decoder
//! carries the unfinished tail of each chunk into the next one.

pub mod decoder;
pub mod drive;
pub mod sink;

pub use decoder::{StreamDecoder, StreamEvent};
pub use drive::{DecodeOutcome, decode_stream};
pub use sink::{ContentAccumulator, StreamSink};
