//! Mock line transport for testing.
//!
//! Provides a [`LineSource`] whose reads are scripted up front or fed live
//! from the test, plus a tracker to observe reads and closure.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::traits::LineSource;

/// One scripted read result.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Yield a line
    Line(String),
    /// Report end of stream
    Eof,
    /// Fail the read
    Error(TransportError),
    /// Never complete (an idle connection)
    Hang,
}

/// Shared view on a mock's activity, usable after the mock has been moved.
#[derive(Debug, Clone, Default)]
pub struct MockTracker {
    reads: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl MockTracker {
    /// Number of `read_line` calls that reached the transport.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Sender half for a live-fed [`MockLineSource`].
///
/// Dropping the feed ends the stream once queued steps are consumed.
#[derive(Debug, Clone)]
pub struct MockLineFeed {
    tx: mpsc::UnboundedSender<MockStep>,
}

impl MockLineFeed {
    /// Queue a line. Returns false if the source is gone.
    pub fn line(&self, line: impl Into<String>) -> bool {
        self.tx.send(MockStep::Line(line.into())).is_ok()
    }

    /// Queue several lines.
    pub fn lines<I, S>(&self, lines: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines.into_iter().all(|line| self.line(line))
    }

    /// Queue a transport failure.
    pub fn error(&self, error: TransportError) -> bool {
        self.tx.send(MockStep::Error(error)).is_ok()
    }

    /// Queue an end of stream.
    pub fn eof(&self) -> bool {
        self.tx.send(MockStep::Eof).is_ok()
    }
}

/// Mock line transport.
///
/// # Example
///
/// ```ignore
/// use pushstream::adapters::mock::MockLineSource;
///
/// let (source, feed) = MockLineSource::live();
/// let tracker = source.tracker();
/// feed.lines(["event: IssueChanged", "data: {}", ""]);
/// // ... hand `source` to an EventStream, then:
/// assert!(tracker.is_closed());
/// ```
#[derive(Debug)]
pub struct MockLineSource {
    script: VecDeque<MockStep>,
    feed: Option<mpsc::UnboundedReceiver<MockStep>>,
    tracker: MockTracker,
}

impl MockLineSource {
    /// Mock that plays back `steps`, then reports end of stream.
    pub fn scripted(steps: impl IntoIterator<Item = MockStep>) -> Self {
        Self {
            script: steps.into_iter().collect(),
            feed: None,
            tracker: MockTracker::default(),
        }
    }

    /// Mock that yields `lines`, then reports end of stream.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(lines.into_iter().map(|l| MockStep::Line(l.into())))
    }

    /// Mock fed at runtime through the returned [`MockLineFeed`].
    ///
    /// Reads wait for the feed, like a socket waiting for the server.
    pub fn live() -> (Self, MockLineFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            script: VecDeque::new(),
            feed: Some(rx),
            tracker: MockTracker::default(),
        };
        (source, MockLineFeed { tx })
    }

    /// Append a step that never completes once the script is exhausted.
    pub fn then_hang(mut self) -> Self {
        self.script.push_back(MockStep::Hang);
        self
    }

    /// Tracker sharing this mock's counters.
    pub fn tracker(&self) -> MockTracker {
        self.tracker.clone()
    }

    async fn next_step(&mut self) -> MockStep {
        if let Some(step) = self.script.pop_front() {
            return step;
        }
        match self.feed.as_mut() {
            Some(feed) => feed.recv().await.unwrap_or(MockStep::Eof),
            None => MockStep::Eof,
        }
    }
}

#[async_trait]
impl LineSource for MockLineSource {
    async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        if self.tracker.is_closed() {
            return Ok(None);
        }
        self.tracker.reads.fetch_add(1, Ordering::SeqCst);

        match self.next_step().await {
            MockStep::Line(line) => Ok(Some(line)),
            MockStep::Eof => Ok(None),
            MockStep::Error(err) => Err(err),
            MockStep::Hang => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.tracker.closed.store(true, Ordering::SeqCst);
        self.script.clear();
        self.feed = None;
    }
}
