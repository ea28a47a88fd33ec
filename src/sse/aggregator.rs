//! Groups stream lines into blank-line delimited event blocks.

use std::mem;

/// Non-empty run of field lines between two blank-line boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBlock {
    lines: Vec<String>,
}

impl EventBlock {
    /// Build a block from lines, or `None` if there are no lines.
    pub fn from_lines<I, S>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            None
        } else {
            Some(Self { lines })
        }
    }

    /// Lines in wire order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of lines in the block.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Stateful line accumulator.
///
/// Feed lines one at a time; a blank line completes the pending block.
/// Blank lines with nothing pending are absorbed as separators.
#[derive(Debug, Default)]
pub struct LineAggregator {
    pending: Vec<String>,
}

impl LineAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its `\n`), returning a block when one completes.
    ///
    /// A trailing `\r` is stripped so CRLF streams frame the same way.
    pub fn push(&mut self, line: impl Into<String>) -> Option<EventBlock> {
        let mut line = line.into();
        if line.ends_with('\r') {
            line.pop();
        }

        if line.trim().is_empty() {
            if self.pending.is_empty() {
                return None;
            }
            return Some(EventBlock {
                lines: mem::take(&mut self.pending),
            });
        }

        self.pending.push(line);
        None
    }

    /// Number of lines waiting for a terminating blank line.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop an unterminated partial block (end of stream), returning how many
    /// lines were discarded.
    pub fn discard_pending(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }
}
