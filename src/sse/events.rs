//! Wire-level SSE types.
//!
//! Contains the classified form of a single wire line and the raw
//! `(type, data)` pair extracted from one event block.

use std::fmt;

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: IssueChanged")
    Event(String),
    /// Data payload (e.g., "data: {\"projectKey\": \"p\"}")
    Data(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
    /// Any other field line (`id:`, `retry:`, wrong case, malformed separator)
    Ignored,
}

/// A `(type, data)` pair extracted from exactly one event block.
///
/// Both fields are non-empty after trimming; the parser never builds a
/// `RawEvent` that violates this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Value of the last `event:` field in the block
    pub event_type: String,
    /// Concatenation of every `data:` field value, without separators
    pub data: String,
}

impl RawEvent {
    /// Build a raw event, rejecting blank type or data.
    pub fn new(event_type: impl Into<String>, data: impl Into<String>) -> Option<Self> {
        let event_type = event_type.into();
        let data = data.into();
        if event_type.trim().is_empty() || data.trim().is_empty() {
            return None;
        }
        Some(Self { event_type, data })
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.event_type, self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_rejects_blank_fields() {
        assert!(RawEvent::new("", "{}").is_none());
        assert!(RawEvent::new("IssueChanged", "   ").is_none());
        assert!(RawEvent::new("  ", "{}").is_none());
    }

    #[test]
    fn test_raw_event_display() {
        let event = RawEvent::new("IssueChanged", "{}").unwrap();
        assert_eq!(event.to_string(), "IssueChanged (2 bytes)");
    }
}
