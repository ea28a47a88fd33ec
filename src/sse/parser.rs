//! SSE block parsing logic
//!
//! Turns one aggregated [`EventBlock`] into a [`RawEvent`]. Field names are
//! matched exactly: `event:` and `data:` with the colon immediately after
//! the name. Everything else in a block is junk and is skipped silently.

use crate::sse::aggregator::EventBlock;
use crate::sse::events::{RawEvent, SseLine};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    SseLine::Ignored
}

/// Accumulator for a single block; never outlives one `parse_block` call.
#[derive(Debug, Default)]
struct BlockFields {
    event_type: Option<String>,
    data: String,
}

impl BlockFields {
    fn apply(mut self, line: SseLine) -> Self {
        match line {
            // Last event: wins
            SseLine::Event(event_type) => self.event_type = Some(event_type),
            SseLine::Data(data) => self.data.push_str(&data),
            SseLine::Empty | SseLine::Comment(_) | SseLine::Ignored => {}
        }
        self
    }

    fn finish(self) -> Option<RawEvent> {
        RawEvent::new(self.event_type?, self.data)
    }
}

/// Parse one event block into a raw event.
///
/// Returns `None` when the block lacks a non-blank `event:` or `data:` value
/// (heartbeats, comments, half-written blocks). This is not an error.
pub fn parse_block(block: &EventBlock) -> Option<RawEvent> {
    block
        .lines()
        .map(parse_sse_line)
        .fold(BlockFields::default(), BlockFields::apply)
        .finish()
}
