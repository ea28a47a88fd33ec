//! Error types for the push event pipeline.
//!
//! Errors are split by the layer that produces them:
//!
//! - **Transport errors**: the line source failed (connection reset, I/O)
//! - **Decode errors**: a payload could not be turned into a domain event
//! - **Stream errors**: lifecycle misuse or fatal failures surfaced to callers
//!
//! | Error | Recovered locally | Surfaces to caller |
//! |-------|-------------------|--------------------|
//! | `DecodeError` | Yes (logged, event dropped) | Never |
//! | `TransportError` | No | Via `StreamError::Transport` |
//! | `StreamError` | No | Yes |
//!
//! All error types are `Clone` so a terminal outcome can be shared between the
//! background producer and every party waiting on it.

mod decode;
mod stream;
mod transport;

pub use decode::DecodeError;
pub use stream::StreamError;
pub use transport::TransportError;

/// Result alias used by stream lifecycle operations.
pub type StreamResult<T> = Result<T, StreamError>;
