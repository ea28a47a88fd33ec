//! Line source over any tokio buffered reader.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::TransportError;
use crate::traits::LineSource;

/// Reads `\n`-terminated lines from an [`AsyncBufRead`].
///
/// Works for files, pipes and in-memory duplex streams. Invalid UTF-8 is
/// replaced rather than failing the stream.
///
/// `read_line` is cancel safe: bytes of a line that were already consumed when
/// the future is dropped stay buffered and are returned by the next call.
#[derive(Debug)]
pub struct AsyncReadLines<R> {
    reader: Option<R>,
    buf: Vec<u8>,
}

impl<R> AsyncReadLines<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            buf: Vec::new(),
        }
    }

    /// Whether the reader has been released.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[async_trait]
impl<R> LineSource for AsyncReadLines<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let read = reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }
        let line = decode_line(&self.buf);
        self.buf.clear();
        Ok(Some(line))
    }

    async fn close(&mut self) {
        self.reader = None;
        self.buf = Vec::new();
    }
}
