//! pushstream - typed server push events over Server-Sent Events
//!
//! Lines flow from a [`LineSource`] through the SSE framing layer
//! ([`sse`]) into the [`EventDecoder`], and come out of an [`EventStream`]
//! as validated [`ServerEvent`]s.

pub mod adapters;
pub mod client;
pub mod config;
pub mod decoder;
pub mod error;
pub mod events;
pub mod sse;
pub mod stream;
pub mod traits;

pub use client::{HttpEventStream, PushClient};
pub use config::PushConfig;
pub use decoder::{DecoderRegistry, EventDecoder};
pub use error::{DecodeError, StreamError, StreamResult, TransportError};
pub use events::ServerEvent;
pub use stream::{EventStream, ListenHandle, ListenOutcome, StreamState};
pub use traits::LineSource;

pub use tokio_util::sync::CancellationToken;
