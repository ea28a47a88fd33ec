//! Domain events pushed by the server.
//!
//! [`ServerEvent`] is a closed set: every variant binds to exactly one wire
//! type string (see [`wire_types`]) and is fully validated before it exists.
//! Variants are immutable once built; fields are reachable through accessors.

mod common;
mod issue;
pub(crate) mod payloads;
mod quality_profile;
mod taint;

use serde::Serialize;

pub use common::{IssueSeverity, IssueType};
pub use issue::{BranchIssue, IssueChangedEvent};
pub use quality_profile::{ActivatedRule, QualityProfileChangedEvent, RuleParam};
pub use taint::{
    Flow, Location, TaintVulnerabilityClosedEvent, TaintVulnerabilityRaisedEvent, TextRange,
};

/// Wire type strings, matched exactly and case-sensitively.
pub mod wire_types {
    pub const ISSUE_CHANGED: &str = "IssueChanged";
    pub const TAINT_VULNERABILITY_RAISED: &str = "TaintVulnerabilityRaised";
    pub const TAINT_VULNERABILITY_CLOSED: &str = "TaintVulnerabilityClosed";
    pub const RULE_SET_CHANGED: &str = "RuleSetChanged";
}

/// Typed server push events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerEvent {
    IssueChanged(IssueChangedEvent),
    TaintVulnerabilityRaised(TaintVulnerabilityRaisedEvent),
    TaintVulnerabilityClosed(TaintVulnerabilityClosedEvent),
    QualityProfileChanged(QualityProfileChangedEvent),
}

impl ServerEvent {
    /// The wire type string this event was decoded from.
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::IssueChanged(_) => wire_types::ISSUE_CHANGED,
            ServerEvent::TaintVulnerabilityRaised(_) => wire_types::TAINT_VULNERABILITY_RAISED,
            ServerEvent::TaintVulnerabilityClosed(_) => wire_types::TAINT_VULNERABILITY_CLOSED,
            ServerEvent::QualityProfileChanged(_) => wire_types::RULE_SET_CHANGED,
        }
    }

    /// Keys of the projects this event concerns.
    pub fn project_keys(&self) -> Vec<&str> {
        match self {
            ServerEvent::IssueChanged(e) => vec![e.project_key()],
            ServerEvent::TaintVulnerabilityRaised(e) => vec![e.project_key()],
            ServerEvent::TaintVulnerabilityClosed(e) => vec![e.project_key()],
            ServerEvent::QualityProfileChanged(e) => {
                e.projects().iter().map(String::as_str).collect()
            }
        }
    }
}

impl From<IssueChangedEvent> for ServerEvent {
    fn from(event: IssueChangedEvent) -> Self {
        ServerEvent::IssueChanged(event)
    }
}

impl From<TaintVulnerabilityRaisedEvent> for ServerEvent {
    fn from(event: TaintVulnerabilityRaisedEvent) -> Self {
        ServerEvent::TaintVulnerabilityRaised(event)
    }
}

impl From<TaintVulnerabilityClosedEvent> for ServerEvent {
    fn from(event: TaintVulnerabilityClosedEvent) -> Self {
        ServerEvent::TaintVulnerabilityClosed(event)
    }
}

impl From<QualityProfileChangedEvent> for ServerEvent {
    fn from(event: QualityProfileChangedEvent) -> Self {
        ServerEvent::QualityProfileChanged(event)
    }
}
