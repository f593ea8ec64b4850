//! Consumers of decoded stream events.

use crate::stream::decoder::StreamEvent;

/// Receives decoded events in arrival order.
pub trait StreamSink {
    /// Handle one event.
    fn on_event(&mut self, event: StreamEvent);
}

impl<F: FnMut(StreamEvent)> StreamSink for F {
    fn on_event(&mut self, event: StreamEvent) {
        self(event);
    }
}

/// Concatenates deltas into the full reply.
#[derive(Debug, Default, Clone)]
pub struct ContentAccumulator {
    content: String,
    deltas: usize,
    ended: bool,
}

impl ContentAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of deltas received.
    #[must_use]
    pub fn delta_count(&self) -> usize {
        self.deltas
    }

    /// Whether an `End` event was received.
    #[must_use]
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Consume the accumulator, returning the text.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }
}

impl StreamSink for ContentAccumulator {
    fn on_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Delta { text } => {
                self.content.push_str(&text);
                self.deltas += 1;
            }
            StreamEvent::End => self.ended = true,
        }
    }
}
