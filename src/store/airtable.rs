//! Airtable-backed participant store
//!
//! Reads the signup table through the Airtable REST API, following the
//! `offset` cursor until the unmatched view is exhausted, and writes
//! matches back as linked-record updates on the giver's row.

use crate::config::StoreSettings;
use crate::error::{Result, SantaError};
use crate::store::provider::ParticipantStore;
use crate::types::{Address, Participant};
use crate::utils::generate_participant_id;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Formula selecting records without an outgoing match
const UNMATCHED_FILTER: &str = "NOT({match})";

/// Participant store backed by the Airtable REST API
pub struct AirtableStore {
    http: reqwest::Client,
    config: StoreSettings,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    records: Vec<StoredRecord>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredRecord {
    id: String,
    #[serde(default)]
    fields: RecordFields,
}

/// Field names match the signup sheet's column labels
#[derive(Debug, Default, Deserialize)]
struct RecordFields {
    name: Option<String>,
    #[serde(rename = "Slack ID")]
    slack_id: Option<String>,
    #[serde(rename = "address-line1")]
    line1: Option<String>,
    #[serde(rename = "address-line2")]
    line2: Option<String>,
    #[serde(rename = "address-city")]
    city: Option<String>,
    #[serde(rename = "address-state")]
    state: Option<String>,
    #[serde(rename = "address-postal")]
    postal: Option<String>,
    #[serde(rename = "address-country")]
    country: Option<String>,
    region: Option<String>,
    likes: Option<String>,
    dislikes: Option<String>,
}

impl AirtableStore {
    pub fn new(config: StoreSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_base_url, self.config.base_id, self.config.table_name
        )
    }

    fn into_participant(record: StoredRecord) -> Participant {
        let fields = record.fields;
        Participant {
            id: generate_participant_id(),
            name: fields.name.unwrap_or_default(),
            slack_id: fields.slack_id,
            address: Address {
                line1: fields.line1,
                line2: fields.line2,
                city: fields.city,
                state: fields.state,
                postal: fields.postal,
                country: fields.country,
            },
            likes: fields.likes,
            dislikes: fields.dislikes,
            region: fields.region,
            record_id: record.id,
        }
    }
}

#[async_trait]
impl ParticipantStore for AirtableStore {
    async fn list_unmatched(&self) -> Result<Vec<Participant>> {
        let mut participants = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.table_url())
                .bearer_auth(&self.config.api_key)
                .query(&[
                    ("view", self.config.view_name.as_str()),
                    ("filterByFormula", UNMATCHED_FILTER),
                ]);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| SantaError::StoreRequestFailed {
                    message: e.to_string(),
                })?;
            if !response.status().is_success() {
                return Err(SantaError::StoreRequestFailed {
                    message: format!("listing unmatched records returned {}", response.status()),
                }
                .into());
            }

            let page: RecordPage =
                response
                    .json()
                    .await
                    .map_err(|e| SantaError::StoreRequestFailed {
                        message: format!("malformed record page: {e}"),
                    })?;

            participants.extend(page.records.into_iter().map(Self::into_participant));

            match page.offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        debug!("Fetched {} unmatched participants", participants.len());
        Ok(participants)
    }

    async fn record_match(&self, giver_record: &str, receiver_record: &str) -> Result<()> {
        let body = serde_json::json!({
            "records": [{
                "id": giver_record,
                "fields": { "match": [receiver_record] }
            }]
        });

        let response = self
            .http
            .patch(self.table_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SantaError::StoreRequestFailed {
                message: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(SantaError::StoreRequestFailed {
                message: format!(
                    "recording match for {giver_record} returned {}",
                    response.status()
                ),
            }
            .into());
        }

        debug!("Recorded match {giver_record} -> {receiver_record}");
        Ok(())
    }
}
