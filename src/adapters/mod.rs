//! Concrete [`LineSource`](crate::traits::LineSource) implementations.
//!
//! # Adapters
//!
//! - [`AsyncReadLines`] - any tokio `AsyncBufRead` (files, pipes, sockets)
//! - [`ByteStreamLines`] - chunked byte streams such as an HTTP response body
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides a scripted line source for tests:
//! - [`mock::MockLineSource`] - scripted lines, EOF, errors and idle hangs

pub mod async_read;
pub mod byte_stream;
pub mod mock;

pub use async_read::AsyncReadLines;
pub use byte_stream::{BoxByteStream, ByteStreamLines, DEFAULT_MAX_LINE_BYTES};
pub use mock::{MockLineFeed, MockLineSource, MockTracker, MockStep};
