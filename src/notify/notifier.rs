//! Best-effort assignment notifier
//!
//! Processes assignments strictly in engine order: render the giver
//! message, deliver it over the channel, then persist the match. One
//! failed assignment never stops the rest; outcomes are collected and
//! returned as an aggregate.

use crate::metrics::MetricsCollector;
use crate::notify::messages;
use crate::slack::MessageSender;
use crate::store::ParticipantStore;
use crate::types::Assignment;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// One assignment that could not be delivered or persisted
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    pub giver: String,
    pub error: String,
}

/// Aggregate outcome of a notify pass
#[derive(Debug, Clone, Default)]
pub struct NotifySummary {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<DeliveryFailure>,
}

/// Delivers giver notifications and records matches, one assignment at a
/// time with a fixed minimum gap between deliveries
pub struct Notifier {
    sender: Arc<dyn MessageSender>,
    store: Arc<dyn ParticipantStore>,
    delivery_delay: Duration,
    metrics: Arc<MetricsCollector>,
}

impl Notifier {
    pub fn new(
        sender: Arc<dyn MessageSender>,
        store: Arc<dyn ParticipantStore>,
        delivery_delay: Duration,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            sender,
            store,
            delivery_delay,
            metrics,
        }
    }

    /// Notify every qualifying assignment in order. Never fails as a
    /// whole; per-assignment errors are logged and collected.
    pub async fn notify_all(&self, assignments: &[Assignment]) -> NotifySummary {
        let mut summary = NotifySummary::default();

        for assignment in assignments {
            // Both sides need a channel id; otherwise neither message nor
            // store write happens.
            let giver_channel = match (&assignment.giver.slack_id, &assignment.receiver.slack_id) {
                (Some(giver_channel), Some(_)) => giver_channel.clone(),
                _ => {
                    debug!(
                        "Skipping assignment for '{}' (missing Slack id)",
                        assignment.giver.name
                    );
                    self.metrics.record_assignment_skipped();
                    summary.skipped += 1;
                    continue;
                }
            };

            // Rate limit: the channel dislikes bursts.
            sleep(self.delivery_delay).await;

            match self.deliver(&giver_channel, assignment).await {
                Ok(()) => {
                    self.metrics.record_message_sent();
                    summary.delivered += 1;
                }
                Err(error) => {
                    warn!(
                        "Failed to notify '{}': {error:#}",
                        assignment.giver.name
                    );
                    self.metrics.record_message_failed();
                    summary.failed += 1;
                    summary.failures.push(DeliveryFailure {
                        giver: assignment.giver.name.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        summary
    }

    async fn deliver(&self, giver_channel: &str, assignment: &Assignment) -> crate::error::Result<()> {
        let text = messages::render_giver_notification(assignment);
        self.sender.send_message(giver_channel, &text).await?;
        self.store
            .record_match(&assignment.giver.record_id, &assignment.receiver.record_id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SantaError;
    use crate::slack::MockMessageSender;
    use crate::store::MockParticipantStore;
    use crate::types::{Address, Participant};
    use crate::utils::generate_participant_id;
    use mockall::predicate::eq;

    fn create_test_participant(name: &str, slack_id: Option<&str>) -> Participant {
        Participant {
            id: generate_participant_id(),
            name: name.to_string(),
            slack_id: slack_id.map(str::to_string),
            address: Address::default(),
            likes: None,
            dislikes: None,
            region: Some("EU".to_string()),
            record_id: format!("rec_{name}"),
        }
    }

    fn create_assignment(giver: Participant, receiver: Participant) -> Assignment {
        Assignment {
            giver,
            receiver,
            same_region: true,
        }
    }

    fn create_notifier(
        sender: MockMessageSender,
        store: MockParticipantStore,
    ) -> Notifier {
        Notifier::new(
            Arc::new(sender),
            Arc::new(store),
            Duration::ZERO,
            Arc::new(MetricsCollector::new().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_delivers_then_persists() {
        let giver = create_test_participant("ada", Some("U_ADA"));
        let receiver = create_test_participant("grace", Some("U_GRACE"));
        let assignment = create_assignment(giver, receiver);

        let mut sender = MockMessageSender::new();
        sender
            .expect_send_message()
            .withf(|channel, text| channel == "U_ADA" && text.contains("*grace*"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut store = MockParticipantStore::new();
        store
            .expect_record_match()
            .with(eq("rec_ada"), eq("rec_grace"))
            .times(1)
            .returning(|_, _| Ok(()));

        let summary = create_notifier(sender, store).notify_all(&[assignment]).await;

        assert_eq!(summary.delivered, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_missing_slack_id_skips_silently() {
        let giver = create_test_participant("quiet", None);
        let receiver = create_test_participant("grace", Some("U_GRACE"));
        let first = create_assignment(giver, receiver.clone());
        // Receiver side missing is also a skip
        let second = create_assignment(receiver, create_test_participant("mute", None));

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().times(0);
        let mut store = MockParticipantStore::new();
        store.expect_record_match().times(0);

        let summary = create_notifier(sender, store)
            .notify_all(&[first, second])
            .await;

        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_stop_later_assignments() {
        let first = create_assignment(
            create_test_participant("ada", Some("U_ADA")),
            create_test_participant("grace", Some("U_GRACE")),
        );
        let second = create_assignment(
            create_test_participant("linus", Some("U_LINUS")),
            create_test_participant("ken", Some("U_KEN")),
        );

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().times(2).returning(|_, _| Ok(()));

        let mut store = MockParticipantStore::new();
        store
            .expect_record_match()
            .with(eq("rec_ada"), eq("rec_grace"))
            .times(1)
            .returning(|_, _| {
                Err(SantaError::StoreRequestFailed {
                    message: "write rejected".to_string(),
                }
                .into())
            });
        store
            .expect_record_match()
            .with(eq("rec_linus"), eq("rec_ken"))
            .times(1)
            .returning(|_, _| Ok(()));

        let summary = create_notifier(sender, store)
            .notify_all(&[first, second])
            .await;

        assert_eq!(summary.delivered, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].giver, "ada");
        assert!(summary.failures[0].error.contains("write rejected"));
    }

    #[tokio::test]
    async fn test_send_failure_skips_persistence() {
        let assignment = create_assignment(
            create_test_participant("ada", Some("U_ADA")),
            create_test_participant("grace", Some("U_GRACE")),
        );

        let mut sender = MockMessageSender::new();
        sender.expect_send_message().times(1).returning(|_, _| {
            Err(SantaError::DeliveryFailed {
                message: "channel_not_found".to_string(),
            }
            .into())
        });

        let mut store = MockParticipantStore::new();
        store.expect_record_match().times(0);

        let summary = create_notifier(sender, store).notify_all(&[assignment]).await;

        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.failed, 1);
    }
}
