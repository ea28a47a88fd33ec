//! Line transport trait abstraction.
//!
//! The SSE pipeline never touches sockets directly. It pulls text lines from
//! a [`LineSource`], which lets production code read from an HTTP body and
//! tests read from a scripted mock.

use async_trait::async_trait;

use crate::error::TransportError;

/// Source of text lines from a live stream.
///
/// # Example
///
/// ```ignore
/// use pushstream::traits::LineSource;
///
/// async fn drain<S: LineSource>(source: &mut S) -> Result<usize, TransportError> {
///     let mut count = 0;
///     while let Some(_line) = source.read_line().await? {
///         count += 1;
///     }
///     source.close().await;
///     Ok(count)
/// }
/// ```
#[async_trait]
pub trait LineSource: Send + 'static {
    /// Read the next line.
    ///
    /// # Returns
    /// - `Ok(Some(line))` - one line, without its `\n` / `\r\n` terminator
    /// - `Ok(None)` - end of stream (also returned after [`close`](Self::close))
    /// - `Err(error)` - the transport failed; the source is unusable
    async fn read_line(&mut self) -> Result<Option<String>, TransportError>;

    /// Release the underlying transport. Idempotent.
    async fn close(&mut self);
}

#[async_trait]
impl<T: LineSource + ?Sized> LineSource for Box<T> {
    async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        (**self).read_line().await
    }

    async fn close(&mut self) {
        (**self).close().await
    }
}
