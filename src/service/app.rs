//! Main application state and run orchestration
//!
//! This module wires the store, Slack client, matching engine and notifier
//! together and owns the match-and-notify cycle triggered over HTTP.

use crate::config::AppConfig;
use crate::error::{Result, SantaError};
use crate::matching::{AssignmentMatcher, RegionalCycleMatcher};
use crate::metrics::MetricsCollector;
use crate::notify::Notifier;
use crate::slack::{MessageSender, SlackClient};
use crate::store::{AirtableStore, ParticipantStore};
use crate::types::RunSummary;
use crate::utils::current_timestamp;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Application state shared by every request handler
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn ParticipantStore>,
    slack: Arc<SlackClient>,
    matcher: Arc<dyn AssignmentMatcher>,
    notifier: Notifier,
    metrics: Arc<MetricsCollector>,
    /// Serializes match cycles so two overlapping triggers cannot race on
    /// the store's unmatched view.
    run_guard: Mutex<()>,
}

impl AppState {
    /// Initialize the application with production collaborators
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(AirtableStore::new(config.store.clone()));
        let slack = Arc::new(SlackClient::new(config.slack.clone()));
        Self::with_components(config, store, slack)
    }

    /// Initialize with injected store and Slack client
    pub fn with_components(
        config: AppConfig,
        store: Arc<dyn ParticipantStore>,
        slack: Arc<SlackClient>,
    ) -> Result<Self> {
        let metrics = Arc::new(MetricsCollector::new()?);
        let notifier = Notifier::new(
            slack.clone() as Arc<dyn MessageSender>,
            store.clone(),
            config.delivery_delay(),
            metrics.clone(),
        );

        Ok(Self {
            config,
            store,
            slack,
            matcher: Arc::new(RegionalCycleMatcher::new()),
            notifier,
            metrics,
            run_guard: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn slack(&self) -> Arc<SlackClient> {
        self.slack.clone()
    }

    /// Run one full match-and-notify cycle
    ///
    /// A store read error or token acquisition error aborts the run;
    /// per-assignment delivery errors are absorbed by the notifier and the
    /// run still reports success.
    pub async fn run_match_cycle(&self) -> Result<RunSummary> {
        let _guard = self
            .run_guard
            .try_lock()
            .map_err(|_| SantaError::RunInProgress)?;

        let started_at = current_timestamp();
        self.metrics.record_run_started();
        info!("Starting match-and-notify cycle");

        let participants = match self.store.list_unmatched().await {
            Ok(participants) => participants,
            Err(error) => {
                self.metrics.record_run_failed();
                return Err(error);
            }
        };
        info!("Loaded {} unmatched participants", participants.len());

        let mut rng = StdRng::from_entropy();
        let assignments = self.matcher.compute_assignments(&participants, &mut rng);
        self.metrics.record_assignments(&assignments);
        info!("Computed {} assignments", assignments.len());

        // Acquire the token before the first send that needs it; a token
        // failure aborts the whole run rather than failing every send.
        let needs_delivery = assignments
            .iter()
            .any(|a| a.giver.slack_id.is_some() && a.receiver.slack_id.is_some());
        if needs_delivery {
            if let Err(error) = self.slack.acquire_token().await {
                self.metrics.record_run_failed();
                return Err(error);
            }
        }

        let outcome = self.notifier.notify_all(&assignments).await;

        let summary = RunSummary {
            participants: participants.len(),
            assignments: assignments.len(),
            delivered: outcome.delivered,
            skipped: outcome.skipped,
            failed: outcome.failed,
            started_at,
            finished_at: current_timestamp(),
        };
        info!(
            "Match cycle complete: {} assignments, {} delivered, {} skipped, {} failed",
            summary.assignments, summary.delivered, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}
