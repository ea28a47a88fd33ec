//! SSE (Server-Sent Events) stream parser
//!
//! Parses the SSE wire format pushed by the server.
//! SSE format consists of:
//! - `event:<type>` - event type line (last one in a block wins)
//! - `data:<payload>` - data payload line(s), concatenated without separator
//! - Empty line - signals end of event
//! - Anything else (`id:`, `retry:`, comments, `event :`) - ignored
//!
//! # Module structure
//! - `events` - Wire types (RawEvent, SseLine)
//! - `aggregator` - Blank-line framing (LineAggregator, EventBlock)
//! - `parser` - Block parsing (parse_sse_line, parse_block)
//! - `source` - Transport-driven reader (RawEventSource, ReadOutcome)

mod aggregator;
mod events;
mod parser;
mod source;

// Re-export public types
pub use aggregator::{EventBlock, LineAggregator};
pub use events::{RawEvent, SseLine};
pub use parser::{parse_block, parse_sse_line};
pub use source::{RawEventSource, ReadOutcome};
