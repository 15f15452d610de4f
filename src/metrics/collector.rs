//! Metrics collection for match runs and notification delivery

use crate::error::Result;
use crate::types::Assignment;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Collects Prometheus metrics for the service
///
/// Counters cover the run lifecycle (started/failed), the engine output by
/// pairing kind, and the per-assignment delivery outcomes.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Registry,

    match_runs_total: IntCounter,
    match_run_failures_total: IntCounter,
    assignments_total: IntCounterVec,
    messages_sent_total: IntCounter,
    messages_failed_total: IntCounter,
    assignments_skipped_total: IntCounter,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let match_runs_total = IntCounter::new(
            "secret_santa_match_runs_total",
            "Total match-and-notify runs started",
        )?;
        let match_run_failures_total = IntCounter::new(
            "secret_santa_match_run_failures_total",
            "Total match-and-notify runs aborted by a store or token error",
        )?;
        let assignments_total = IntCounterVec::new(
            Opts::new(
                "secret_santa_assignments_total",
                "Assignments produced by the matching engine",
            ),
            &["pairing"],
        )?;
        let messages_sent_total = IntCounter::new(
            "secret_santa_messages_sent_total",
            "Giver notifications delivered and persisted",
        )?;
        let messages_failed_total = IntCounter::new(
            "secret_santa_messages_failed_total",
            "Giver notifications that failed to deliver or persist",
        )?;
        let assignments_skipped_total = IntCounter::new(
            "secret_santa_assignments_skipped_total",
            "Assignments skipped for lack of a Slack id",
        )?;

        registry.register(Box::new(match_runs_total.clone()))?;
        registry.register(Box::new(match_run_failures_total.clone()))?;
        registry.register(Box::new(assignments_total.clone()))?;
        registry.register(Box::new(messages_sent_total.clone()))?;
        registry.register(Box::new(messages_failed_total.clone()))?;
        registry.register(Box::new(assignments_skipped_total.clone()))?;

        Ok(Self {
            registry,
            match_runs_total,
            match_run_failures_total,
            assignments_total,
            messages_sent_total,
            messages_failed_total,
            assignments_skipped_total,
        })
    }

    /// Prometheus registry for the exposition endpoint
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_run_started(&self) {
        self.match_runs_total.inc();
    }

    pub fn record_run_failed(&self) {
        self.match_run_failures_total.inc();
    }

    pub fn record_assignments(&self, assignments: &[Assignment]) {
        for assignment in assignments {
            self.assignments_total
                .with_label_values(&[assignment.pairing_kind()])
                .inc();
        }
    }

    pub fn record_message_sent(&self) {
        self.messages_sent_total.inc();
    }

    pub fn record_message_failed(&self) {
        self.messages_failed_total.inc();
    }

    pub fn record_assignment_skipped(&self) {
        self.assignments_skipped_total.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, TextEncoder};

    #[test]
    fn test_counters_register_and_encode() {
        let collector = MetricsCollector::new().unwrap();
        collector.record_run_started();
        collector.record_message_sent();
        collector.record_message_sent();

        let encoder = TextEncoder::new();
        let output = encoder
            .encode_to_string(&collector.registry().gather())
            .unwrap();

        assert!(output.contains("secret_santa_match_runs_total 1"));
        assert!(output.contains("secret_santa_messages_sent_total 2"));
    }
}
