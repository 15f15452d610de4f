//! Common types used throughout the Secret Santa service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Synthetic identity of a participant within a single run.
///
/// Two participants may share a name, so every record read from the store
/// gets a fresh id for the duration of the run.
pub type ParticipantId = Uuid;

/// Opaque reference to a participant's persistent store record
pub type RecordId = String;

/// Mailing address of a participant. Every field is optional; the store
/// does not enforce completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
    pub country: Option<String>,
}

/// A gift-exchange participant as read from the store at the start of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Slack channel identifier; participants without one are matched but
    /// never notified.
    pub slack_id: Option<String>,
    pub address: Address,
    pub likes: Option<String>,
    pub dislikes: Option<String>,
    /// Coarse geographic grouping, first matching preference
    pub region: Option<String>,
    /// Store record reference used for the match write-back
    pub record_id: RecordId,
}

impl Participant {
    /// Country grouping key, second matching preference within a region
    pub fn country(&self) -> Option<&str> {
        self.address.country.as_deref()
    }
}

/// An ordered (giver, receiver) pair produced by the matching engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub giver: Participant,
    pub receiver: Participant,
    /// Whether the pair was formed by a regional pass (true) or a global
    /// leftover pass (false); drives message wording.
    pub same_region: bool,
}

impl Assignment {
    /// Metric/label vocabulary for the pairing kind
    pub fn pairing_kind(&self) -> &'static str {
        if self.same_region {
            "regional"
        } else {
            "cross_region"
        }
    }
}

/// Aggregate outcome of one match-and-notify cycle
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Participants read from the store's unmatched view
    pub participants: usize,
    /// Assignments produced by the engine
    pub assignments: usize,
    /// Assignments delivered and persisted
    pub delivered: usize,
    /// Assignments skipped for lack of a Slack id on either side
    pub skipped: usize,
    /// Assignments whose delivery or persistence failed
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
