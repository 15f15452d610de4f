//! Participant store interface and in-memory implementation

use crate::error::Result;
use crate::types::Participant;
use async_trait::async_trait;
use std::sync::RwLock;

#[cfg(test)]
use mockall::automock;

/// Trait for reading and updating participant records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// Fetch every participant that does not yet have an outgoing match.
    /// The store pre-filters; the engine never re-checks.
    async fn list_unmatched(&self) -> Result<Vec<Participant>>;

    /// Record that the giver has been matched with the receiver. This
    /// removes the giver from future unmatched reads.
    async fn record_match(&self, giver_record: &str, receiver_record: &str) -> Result<()>;
}

/// In-memory participant store for tests and local development
#[derive(Debug, Default)]
pub struct InMemoryParticipantStore {
    participants: RwLock<Vec<Participant>>,
    matches: RwLock<Vec<(String, String)>>,
}

impl InMemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with participants
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants: RwLock::new(participants),
            matches: RwLock::new(Vec::new()),
        }
    }

    pub fn add_participant(&self, participant: Participant) {
        if let Ok(mut participants) = self.participants.write() {
            participants.push(participant);
        }
    }

    /// All (giver, receiver) record pairs written so far
    pub fn recorded_matches(&self) -> Vec<(String, String)> {
        self.matches
            .read()
            .map(|matches| matches.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ParticipantStore for InMemoryParticipantStore {
    async fn list_unmatched(&self) -> Result<Vec<Participant>> {
        let matched_givers: Vec<String> = self
            .recorded_matches()
            .into_iter()
            .map(|(giver, _)| giver)
            .collect();

        let participants = self
            .participants
            .read()
            .map(|participants| participants.clone())
            .unwrap_or_default();

        Ok(participants
            .into_iter()
            .filter(|p| !matched_givers.contains(&p.record_id))
            .collect())
    }

    async fn record_match(&self, giver_record: &str, receiver_record: &str) -> Result<()> {
        let mut matches = self
            .matches
            .write()
            .map_err(|_| crate::error::SantaError::InternalError {
                message: "Failed to acquire matches write lock".to_string(),
            })?;
        matches.push((giver_record.to_string(), receiver_record.to_string()));
        Ok(())
    }
}
