//! Raw event to domain event decoding.
//!
//! A [`DecoderRegistry`] maps wire type strings to decode functions. The
//! [`EventDecoder`] looks events up in it and absorbs every failure: callers
//! only ever see `Some(event)` or `None`.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::events::payloads::{
    IssueChangedPayload, RuleSetChangedPayload, TaintVulnerabilityClosedPayload,
    TaintVulnerabilityRaisedPayload,
};
use crate::events::{
    wire_types, IssueChangedEvent, QualityProfileChangedEvent, ServerEvent,
    TaintVulnerabilityClosedEvent, TaintVulnerabilityRaisedEvent,
};
use crate::sse::RawEvent;

/// Longest payload excerpt written to a log entry.
const MAX_LOGGED_PAYLOAD_CHARS: usize = 512;

/// Decode function for one wire type.
pub type DecodeFn = fn(&str) -> Result<ServerEvent, DecodeError>;

/// Deserialize `data` as `P`, then validate it into a domain event.
fn decode_as<P, E>(data: &str) -> Result<ServerEvent, DecodeError>
where
    P: DeserializeOwned,
    E: TryFrom<P, Error = DecodeError> + Into<ServerEvent>,
{
    let payload: P = serde_json::from_str(data)?;
    E::try_from(payload).map(Into::into)
}

/// Immutable mapping from wire type to decode function.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, DecodeFn>,
}

static STANDARD_REGISTRY: Lazy<Arc<DecoderRegistry>> =
    Lazy::new(|| Arc::new(DecoderRegistry::standard()));

impl DecoderRegistry {
    /// Registry with no decoders; every event type is unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry for every event type the server is known to push.
    pub fn standard() -> Self {
        Self::empty()
            .with(
                wire_types::ISSUE_CHANGED,
                decode_as::<IssueChangedPayload, IssueChangedEvent>,
            )
            .with(
                wire_types::TAINT_VULNERABILITY_RAISED,
                decode_as::<TaintVulnerabilityRaisedPayload, TaintVulnerabilityRaisedEvent>,
            )
            .with(
                wire_types::TAINT_VULNERABILITY_CLOSED,
                decode_as::<TaintVulnerabilityClosedPayload, TaintVulnerabilityClosedEvent>,
            )
            .with(
                wire_types::RULE_SET_CHANGED,
                decode_as::<RuleSetChangedPayload, QualityProfileChangedEvent>,
            )
    }

    /// Shared instance of [`standard`](Self::standard), built once.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&STANDARD_REGISTRY)
    }

    /// Register (or replace) the decoder for `event_type`.
    pub fn with(mut self, event_type: impl Into<String>, decode: DecodeFn) -> Self {
        self.decoders.insert(event_type.into(), decode);
        self
    }

    /// Decoder bound to `event_type`, if any. Matching is exact.
    pub fn get(&self, event_type: &str) -> Option<DecodeFn> {
        self.decoders.get(event_type).copied()
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.decoders.contains_key(event_type)
    }

    /// Registered wire types, sorted.
    pub fn event_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("event_types", &self.event_types())
            .finish()
    }
}

/// Truncate a payload for logging, cutting on a char boundary.
fn payload_excerpt(data: &str) -> std::borrow::Cow<'_, str> {
    match data.char_indices().nth(MAX_LOGGED_PAYLOAD_CHARS) {
        None => data.into(),
        Some((cut, _)) => format!("{}…", &data[..cut]).into(),
    }
}

/// Turns raw events into domain events.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    registry: Arc<DecoderRegistry>,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDecoder {
    /// Decoder over the standard registry.
    pub fn new() -> Self {
        Self {
            registry: DecoderRegistry::shared(),
        }
    }

    pub fn with_registry(registry: impl Into<Arc<DecoderRegistry>>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Decode a raw event.
    ///
    /// - unknown type: `None`, debug note only
    /// - malformed or incomplete payload: `None`, one warning with context
    /// - valid payload: `Some(event)`
    pub fn decode(&self, raw: &RawEvent) -> Option<ServerEvent> {
        let Some(decode) = self.registry.get(&raw.event_type) else {
            debug!("Ignoring unsupported server event type: {}", raw.event_type);
            return None;
        };

        match decode(&raw.data) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(
                    event_type = %raw.event_type,
                    error_kind = err.kind(),
                    field = err.field(),
                    project_key = err.project_key(),
                    payload = %payload_excerpt(&raw.data),
                    "Failed to decode server event: {}",
                    err
                );
                None
            }
        }
    }
}
