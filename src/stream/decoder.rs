//! Incremental decoder for chat-completion SSE streams.

use crate::stream::sink::StreamSink;
use bytes::BytesMut;
use serde::Deserialize;

/// Prefix of an SSE data line.
const DATA_PREFIX: &[u8] = b"data: ";

/// Payload marking intended end of stream.
const DONE_SENTINEL: &[u8] = b"[DONE]";

/// One decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental content fragment, appended in order to the output.
    Delta {
        /// Fragment text. Never empty.
        text: String,
    },

    /// The sentinel was observed; nothing follows.
    End,
}

impl StreamEvent {
    /// Convenience accessor for `Delta` contents.
    #[must_use]
    pub fn as_delta(&self) -> Option<&str> {
        match self {
            Self::Delta { text } => Some(text),
            Self::End => None,
        }
    }
}

/// Envelope of a single streamed completion chunk.
#[derive(Debug, Deserialize)]
struct ChunkEnvelope {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Reassembles `data: <payload>` lines from arbitrarily split chunks.
///
/// The carry-over buffer holds raw bytes and is split on `\n` only, so a
/// multi-byte character cut in half by the transport is rejoined before it is
/// decoded. After [`StreamEvent::End`] the decoder ignores further input.
///
/// One decoder serves exactly one stream; create a new one per request.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buf: BytesMut,
    // Prefix of `buf` already known to hold no newline
    scanned: usize,
    done: bool,
}

impl StreamDecoder {
    /// Create a decoder with an empty carry-over buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been observed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Bytes held back because they do not yet form a complete line.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Process one chunk, emitting events for every complete line it closes.
    ///
    /// The trailing partial line stays buffered until a later chunk (or
    /// [`finish`](Self::finish)) completes it.
    pub fn feed<S: StreamSink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) {
        if self.done {
            return;
        }

        self.buf.extend_from_slice(chunk);
        let mut from = self.scanned;
        while let Some(offset) = self.buf[from..].iter().position(|b| *b == b'\n') {
            let pos = from + offset;
            let line = self.buf.split_to(pos + 1);
            from = 0;
            self.process_line(&line[..pos], sink);
            if self.done {
                return;
            }
        }
        self.scanned = self.buf.len();
    }

    /// Signal end of input.
    ///
    /// Any buffered remainder is treated as a complete final line. Missing
    /// `[DONE]` is not an error.
    pub fn finish<S: StreamSink + ?Sized>(&mut self, sink: &mut S) {
        self.scanned = 0;
        if self.done || self.buf.is_empty() {
            self.buf.clear();
            return;
        }

        let rest = self.buf.split();
        self.process_line(&rest, sink);
    }

    fn process_line<S: StreamSink + ?Sized>(&mut self, line: &[u8], sink: &mut S) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        // Blank keep-alives, `event:`, `id:`, `retry:` and `:` comments
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return;
        };

        if payload == DONE_SENTINEL {
            self.done = true;
            self.buf.clear();
            self.scanned = 0;
            sink.on_event(StreamEvent::End);
            return;
        }

        match serde_json::from_slice::<ChunkEnvelope>(payload) {
            Ok(envelope) => {
                if let Some(text) = delta_text(envelope) {
                    sink.on_event(StreamEvent::Delta { text });
                }
            }
            Err(e) => {
                log::warn!(
                    "skipping malformed stream frame ({e}): {}",
                    String::from_utf8_lossy(payload)
                );
            }
        }
    }
}

/// Extract `choices[0].delta.content` if present and non-empty.
fn delta_text(envelope: ChunkEnvelope) -> Option<String> {
    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|text| !text.is_empty())
}
