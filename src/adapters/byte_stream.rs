//! Line source over a stream of byte chunks.
//!
//! HTTP bodies arrive as arbitrarily split [`Bytes`] chunks; a line (or a
//! multi-byte character) can straddle chunk boundaries, so bytes are buffered
//! until a full `\n`-terminated line is available.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::Stream;
use futures_util::StreamExt;
use std::pin::Pin;

use super::async_read::decode_line;
use crate::error::TransportError;
use crate::traits::LineSource;

/// Boxed chunk stream, as produced by `reqwest::Response::bytes_stream`.
pub type BoxByteStream<E> = Pin<Box<dyn Stream<Item = Result<Bytes, E>> + Send>>;

/// Default cap on a single unterminated line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// Splits a chunked byte stream into lines.
pub struct ByteStreamLines<S> {
    stream: Option<S>,
    buffer: BytesMut,
    /// Prefix of `buffer` already known to hold no `\n`
    scanned: usize,
    max_line_bytes: usize,
    /// Set once the inner stream has returned `None`.
    exhausted: bool,
}

impl<S> std::fmt::Debug for ByteStreamLines<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStreamLines")
            .field("open", &self.stream.is_some())
            .field("buffered", &self.buffer.len())
            .field("max_line_bytes", &self.max_line_bytes)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

impl<S, E> ByteStreamLines<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
    E: Into<TransportError> + Send + 'static,
{
    /// Wrap a chunk stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
            buffer: BytesMut::new(),
            scanned: 0,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            exhausted: false,
        }
    }

    /// Fail the stream once a line grows past `limit` bytes (at least 1).
    pub fn with_max_line_bytes(mut self, limit: usize) -> Self {
        self.max_line_bytes = limit.max(1);
        self
    }

    /// Whether the chunk stream has been released.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    fn take_line(&mut self) -> Option<String> {
        match self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let line = self.buffer.split_to(self.scanned + offset + 1);
                self.scanned = 0;
                Some(decode_line(&line))
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }
}

#[async_trait]
impl<S, E> LineSource for ByteStreamLines<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
    E: Into<TransportError> + Send + 'static,
{
    async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            if self.buffer.len() > self.max_line_bytes {
                return Err(TransportError::LineTooLong {
                    limit: self.max_line_bytes,
                });
            }

            if self.exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                // Final unterminated line
                let rest = self.buffer.split();
                self.scanned = 0;
                return Ok(Some(decode_line(&rest)));
            }

            let Some(stream) = self.stream.as_mut() else {
                return Ok(None);
            };

            match stream.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(err)) => return Err(err.into()),
                None => self.exhausted = true,
            }
        }
    }

    async fn close(&mut self) {
        self.stream = None;
        self.buffer.clear();
        self.scanned = 0;
        self.exhausted = true;
    }
}
