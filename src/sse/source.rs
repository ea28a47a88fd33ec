//! Pull-based raw event reader.
//!
//! [`RawEventSource`] owns the line transport for its whole life. Each call to
//! [`read_next`](RawEventSource::read_next) keeps consuming lines and blocks
//! until it has a genuine `(type, data)` pair, the stream ends, or the
//! cancellation token fires.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::sse::aggregator::LineAggregator;
use crate::sse::events::RawEvent;
use crate::sse::parser::parse_block;
use crate::traits::LineSource;

/// Result of one [`RawEventSource::read_next`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete raw event
    Event(RawEvent),
    /// The transport reported end of stream
    EndOfStream,
    /// The token was cancelled before or during the read
    Cancelled,
}

impl ReadOutcome {
    /// The event, if this outcome carries one.
    pub fn into_event(self) -> Option<RawEvent> {
        match self {
            ReadOutcome::Event(event) => Some(event),
            ReadOutcome::EndOfStream | ReadOutcome::Cancelled => None,
        }
    }
}

/// Reads raw SSE events from a [`LineSource`].
#[derive(Debug)]
pub struct RawEventSource<S> {
    /// `None` once the transport has been released
    reader: Option<S>,
    aggregator: LineAggregator,
    /// Set by the first `Cancelled` outcome; later reads never touch `reader`
    cancelled: bool,
}

impl<S: LineSource> RawEventSource<S> {
    /// Take ownership of an already-open line source.
    pub fn new(reader: S) -> Self {
        Self {
            reader: Some(reader),
            aggregator: LineAggregator::new(),
            cancelled: false,
        }
    }

    /// Whether the transport has been released (EOF, failure or `close`).
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Whether a read has already returned [`ReadOutcome::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Read the next raw event.
    ///
    /// An already-cancelled token returns [`ReadOutcome::Cancelled`] without
    /// touching the transport; cancelling mid-read abandons the pending line
    /// read. Either way the source is spent: every later call returns
    /// `Cancelled` again, whatever token it is given, and the transport is
    /// left for [`close`](Self::close). A transport failure closes the reader
    /// before the error is returned, and the source is unusable afterwards.
    pub async fn read_next(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<ReadOutcome, TransportError> {
        loop {
            if self.cancelled || cancel.is_cancelled() {
                self.cancelled = true;
                return Ok(ReadOutcome::Cancelled);
            }

            let Some(reader) = self.reader.as_mut() else {
                return Ok(ReadOutcome::EndOfStream);
            };

            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.cancelled = true;
                    return Ok(ReadOutcome::Cancelled);
                }
                line = reader.read_line() => line,
            };

            match line {
                Ok(Some(line)) => {
                    let Some(block) = self.aggregator.push(line) else {
                        continue;
                    };
                    if let Some(event) = parse_block(&block) {
                        return Ok(ReadOutcome::Event(event));
                    }
                }
                Ok(None) => {
                    let dropped = self.aggregator.discard_pending();
                    if dropped > 0 {
                        debug!("Discarding unterminated event block ({} lines) at end of stream", dropped);
                    }
                    self.close().await;
                    return Ok(ReadOutcome::EndOfStream);
                }
                Err(err) => {
                    warn!("Event stream read failed: {}", err);
                    self.close().await;
                    return Err(err);
                }
            }
        }
    }

    /// Release the transport. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.close().await;
        }
        self.aggregator.discard_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockLineSource, MockStep};
    use crate::adapters::AsyncReadLines;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, BufReader};

    async fn drain<S: LineSource>(source: &mut RawEventSource<S>) -> Vec<RawEvent> {
        let token = CancellationToken::new();
        let mut events = Vec::new();
        while let ReadOutcome::Event(event) = source.read_next(&token).await.unwrap() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_framed_blocks_become_events_and_trailing_block_is_dropped() {
        let mock = MockLineSource::from_lines([
            "event: e1",
            "data: d1",
            "",
            "event: e2",
            "data: d2",
            "",
            "event: e3",
            "data: never terminated",
        ]);
        let tracker = mock.tracker();
        let mut source = RawEventSource::new(mock);

        let events = drain(&mut source).await;
        assert_eq!(
            events,
            vec![
                RawEvent::new("e1", "d1").unwrap(),
                RawEvent::new("e2", "d2").unwrap(),
            ]
        );
        assert!(source.is_closed());
        assert!(tracker.is_closed());
    }

    #[tokio::test]
    async fn test_line_numbered_scenario_yields_two_blocks() {
        // Blocks of junk lines parse to nothing, so attach real fields to
        // count the framed blocks.
        let mock = MockLineSource::from_lines([
            "event: line 1", "data: line 2", "data: line 3", "",
            "event: line 4", "data: line 5", "",
            "event: line 6", "data: line 7",
        ]);
        let mut source = RawEventSource::new(mock);

        let events = drain(&mut source).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "line 2line 3");
        assert_eq!(events[1].event_type, "line 4");
    }

    #[tokio::test]
    async fn test_skips_blocks_without_events_in_one_call() {
        let mock = MockLineSource::from_lines([
            ": heartbeat",
            "",
            "data: no type",
            "",
            "",
            "event: real",
            "data: payload",
            "",
        ]);
        let mut source = RawEventSource::new(mock);
        let token = CancellationToken::new();

        let outcome = source.read_next(&token).await.unwrap();
        assert_eq!(
            outcome,
            ReadOutcome::Event(RawEvent::new("real", "payload").unwrap())
        );
        assert_eq!(source.read_next(&token).await.unwrap(), ReadOutcome::EndOfStream);
        // Further reads stay at end of stream
        assert_eq!(source.read_next(&token).await.unwrap(), ReadOutcome::EndOfStream);
    }

    #[tokio::test]
    async fn test_cancelled_token_reads_nothing() {
        let mock = MockLineSource::from_lines(["event: a", "data: b", ""]);
        let tracker = mock.tracker();
        let mut source = RawEventSource::new(mock);
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(source.read_next(&token).await.unwrap(), ReadOutcome::Cancelled);
        assert_eq!(tracker.reads(), 0);
        assert!(!source.is_closed());
        assert!(source.is_cancelled());

        // A fresh token does not revive the source
        let fresh = CancellationToken::new();
        assert_eq!(source.read_next(&fresh).await.unwrap(), ReadOutcome::Cancelled);
        assert_eq!(tracker.reads(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_read_returns_cancelled() {
        let mock = MockLineSource::from_lines(["event: a"]).then_hang();
        let mut source = RawEventSource::new(mock);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let outcome = tokio::time::timeout(Duration::from_secs(5), source.read_next(&token))
            .await
            .expect("cancellation should end the read");
        assert_eq!(outcome.unwrap(), ReadOutcome::Cancelled);
        assert!(source.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_mid_line_leaves_source_spent() {
        let (client, mut server) = tokio::io::duplex(256);
        let mut source = RawEventSource::new(AsyncReadLines::new(BufReader::new(client)));
        let token = CancellationToken::new();

        server
            .write_all(b"event: IssueChanged\ndata: {\"a\"")
            .await
            .unwrap();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        assert_eq!(source.read_next(&token).await.unwrap(), ReadOutcome::Cancelled);

        server.write_all(b":1}\n\n").await.unwrap();
        drop(server);

        let fresh = CancellationToken::new();
        assert_eq!(source.read_next(&fresh).await.unwrap(), ReadOutcome::Cancelled);
        assert!(!source.is_closed());

        source.close().await;
        assert!(source.is_closed());
    }

    #[tokio::test]
    async fn test_transport_error_closes_reader_and_propagates() {
        let mock = MockLineSource::scripted([
            MockStep::Line("event: a".to_string()),
            MockStep::Error(TransportError::Io {
                message: "connection reset".to_string(),
            }),
            MockStep::Line("data: unreachable".to_string()),
        ]);
        let tracker = mock.tracker();
        let mut source = RawEventSource::new(mock);
        let token = CancellationToken::new();

        let err = source.read_next(&token).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Io {
                message: "connection reset".to_string()
            }
        );
        assert!(tracker.is_closed());
        assert!(source.is_closed());
        assert_eq!(source.read_next(&token).await.unwrap(), ReadOutcome::EndOfStream);
    }

    #[test]
    fn test_into_event() {
        assert!(ReadOutcome::Cancelled.into_event().is_none());
        assert!(ReadOutcome::EndOfStream.into_event().is_none());
        let event = RawEvent::new("a", "b").unwrap();
        assert_eq!(ReadOutcome::Event(event.clone()).into_event(), Some(event));
    }
}
