//! Test fixtures and mock implementations for integration testing

use async_trait::async_trait;
use secret_santa::error::{Result, SantaError};
use secret_santa::store::{InMemoryParticipantStore, ParticipantStore};
use secret_santa::types::{Address, Participant};
use secret_santa::utils::generate_participant_id;

/// Build a participant with the fields the matching passes care about
pub fn create_participant(
    name: &str,
    region: Option<&str>,
    country: Option<&str>,
    slack_id: Option<&str>,
) -> Participant {
    Participant {
        id: generate_participant_id(),
        name: name.to_string(),
        slack_id: slack_id.map(str::to_string),
        address: Address {
            line1: Some(format!("{name} street 1")),
            country: country.map(str::to_string),
            ..Address::default()
        },
        likes: Some("surprises".to_string()),
        dislikes: Some("socks".to_string()),
        region: region.map(str::to_string),
        record_id: format!("rec_{name}"),
    }
}

/// Store that rejects the match write-back for one configured giver,
/// for exercising best-effort delivery
pub struct FailingMatchStore {
    inner: InMemoryParticipantStore,
    fail_for: String,
}

impl FailingMatchStore {
    pub fn new(participants: Vec<Participant>, fail_for: &str) -> Self {
        Self {
            inner: InMemoryParticipantStore::with_participants(participants),
            fail_for: fail_for.to_string(),
        }
    }

    pub fn recorded_matches(&self) -> Vec<(String, String)> {
        self.inner.recorded_matches()
    }
}

#[async_trait]
impl ParticipantStore for FailingMatchStore {
    async fn list_unmatched(&self) -> Result<Vec<Participant>> {
        self.inner.list_unmatched().await
    }

    async fn record_match(&self, giver_record: &str, receiver_record: &str) -> Result<()> {
        if giver_record == self.fail_for {
            return Err(SantaError::StoreRequestFailed {
                message: format!("write rejected for {giver_record}"),
            }
            .into());
        }
        self.inner.record_match(giver_record, receiver_record).await
    }
}
