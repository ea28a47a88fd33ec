//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`LineSource`] - Line-oriented transport feeding the SSE pipeline

pub mod line_source;

pub use line_source::LineSource;
