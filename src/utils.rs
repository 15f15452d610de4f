//! Utility functions for the Secret Santa service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a fresh run-scoped participant id
pub fn generate_participant_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}
