//! Async consumption loop driving a [`StreamDecoder`] from a byte stream.

use crate::error::{Error, Result};
use crate::stream::decoder::StreamDecoder;
use crate::stream::sink::StreamSink;
use futures_util::{Stream, StreamExt};
use std::fmt::Display;

/// How a decode loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The `[DONE]` sentinel was observed.
    Sentinel,

    /// The transport closed without a sentinel. Still a normal completion.
    Closed,
}

/// Read `stream` to completion, forwarding decoded events to `sink`.
///
/// The stream is owned by this call and dropped on every exit path, which
/// releases the underlying reader: on the sentinel (remaining input is never
/// read), on natural end of input, and on a read failure.
///
/// # Errors
///
/// Returns [`Error::Transport`] once if reading a chunk fails. No events are
/// emitted after the failure.
pub async fn decode_stream<St, B, E, S>(stream: St, sink: &mut S) -> Result<DecodeOutcome>
where
    St: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    S: StreamSink + ?Sized,
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = StreamDecoder::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Transport {
            status: None,
            message: format!("stream read failed: {e}"),
        })?;

        decoder.feed(chunk.as_ref(), sink);
        if decoder.is_done() {
            log::debug!("stream ended with sentinel");
            return Ok(DecodeOutcome::Sentinel);
        }
    }

    decoder.finish(sink);
    if decoder.is_done() {
        Ok(DecodeOutcome::Sentinel)
    } else {
        log::debug!("stream closed without sentinel");
        Ok(DecodeOutcome::Closed)
    }
}
