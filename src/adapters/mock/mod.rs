//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions,
//! enabling unit testing without network dependencies.
//!
//! # Available Mocks
//!
//! - [`MockLineSource`] - Scripted or live-fed line transport

pub mod lines;

pub use lines::{MockLineFeed, MockLineSource, MockTracker, MockStep};
