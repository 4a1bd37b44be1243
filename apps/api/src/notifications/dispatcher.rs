//! Background reminder delivery.
//!
//! [`ReminderDispatcher`] polls on a fixed interval, claims pending reminders
//! whose due time has passed (status `sending`), sends each through an
//! [`EmailSender`], and records every outcome independently. A failed
//! reminder is marked `failed` with the error and is not picked up again.
//! A claim whose outcome could not be recorded is failed after
//! [`STALE_CLAIM_MINUTES`] instead of being resent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::reminder::ReminderRow;
use crate::notifications::store::{claim_due, fail_stale_claims, mark_failed, mark_sent};
use crate::notifications::transactional::{render_html, EmailSender, OutgoingEmail};

/// Minutes a claim may stay unresolved before it is failed.
pub const STALE_CLAIM_MINUTES: i64 = 15;

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    pub reminder_id: Uuid,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        self.error.is_none()
    }
}

pub struct ReminderDispatcher {
    pool: PgPool,
    sender: Arc<dyn EmailSender>,
    poll_interval: Duration,
    batch_size: i64,
}

impl ReminderDispatcher {
    pub fn new(
        pool: PgPool,
        sender: Arc<dyn EmailSender>,
        poll_interval: Duration,
        batch_size: i64,
    ) -> Self {
        Self {
            pool,
            sender,
            poll_interval,
            batch_size,
        }
    }

    /// Runs until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder dispatcher cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_due().await {
                        tracing::error!(error = %e, "Failed to process due reminders");
                    }
                }
            }
        }
    }

    async fn process_due(&self) -> Result<(), sqlx::Error> {
        let cutoff = Utc::now() - chrono::Duration::minutes(STALE_CLAIM_MINUTES);
        let expired = fail_stale_claims(&self.pool, cutoff).await?;
        if expired > 0 {
            tracing::warn!(count = expired, "Failed reminders with unrecorded outcomes");
        }

        let mut due = claim_due(&self.pool, Utc::now(), self.batch_size).await?;
        if due.is_empty() {
            return Ok(());
        }
        due.sort_by_key(|r| r.due_at);

        let outcomes = deliver_batch(self.sender.as_ref(), &due).await;
        let summary = record_outcomes(&PgOutcomeRecorder { pool: &self.pool }, &outcomes).await;

        tracing::info!(
            sent = summary.sent,
            failed = summary.failed,
            unrecorded = summary.unrecorded,
            "Processed due reminders"
        );
        Ok(())
    }
}

/// Where delivery outcomes are written.
#[async_trait]
pub trait OutcomeRecorder: Send + Sync {
    async fn record_sent(&self, id: Uuid) -> Result<(), sqlx::Error>;
    async fn record_failed(&self, id: Uuid, error: &str) -> Result<(), sqlx::Error>;
}

struct PgOutcomeRecorder<'a> {
    pool: &'a PgPool,
}

#[async_trait]
impl OutcomeRecorder for PgOutcomeRecorder<'_> {
    async fn record_sent(&self, id: Uuid) -> Result<(), sqlx::Error> {
        mark_sent(self.pool, id).await
    }

    async fn record_failed(&self, id: Uuid, error: &str) -> Result<(), sqlx::Error> {
        mark_failed(self.pool, id, error).await
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordSummary {
    pub sent: usize,
    pub failed: usize,
    /// Outcomes the recorder rejected; those rows stay claimed.
    pub unrecorded: usize,
}

/// Records every outcome. A store error on one is logged and the rest are
/// still recorded.
pub async fn record_outcomes(
    recorder: &dyn OutcomeRecorder,
    outcomes: &[DeliveryOutcome],
) -> RecordSummary {
    let mut summary = RecordSummary::default();
    for outcome in outcomes {
        let recorded = match &outcome.error {
            None => recorder.record_sent(outcome.reminder_id).await,
            Some(error) => {
                tracing::warn!(
                    reminder_id = %outcome.reminder_id,
                    error = %error,
                    "Reminder delivery failed"
                );
                recorder.record_failed(outcome.reminder_id, error).await
            }
        };
        match recorded {
            Ok(()) if outcome.is_sent() => summary.sent += 1,
            Ok(()) => summary.failed += 1,
            Err(e) => {
                tracing::error!(
                    reminder_id = %outcome.reminder_id,
                    error = %e,
                    "Failed to record reminder outcome"
                );
                summary.unrecorded += 1;
            }
        }
    }
    summary
}

pub fn to_email(reminder: &ReminderRow) -> OutgoingEmail {
    OutgoingEmail {
        to: reminder.recipient_email.clone(),
        subject: reminder.subject.clone(),
        html: render_html(&reminder.body),
    }
}

/// Sends every reminder in order. One failure does not stop the rest.
pub async fn deliver_batch(sender: &dyn EmailSender, reminders: &[ReminderRow]) -> Vec<DeliveryOutcome> {
    let mut outcomes = Vec::with_capacity(reminders.len());
    for reminder in reminders {
        let error = sender
            .send(&to_email(reminder))
            .await
            .err()
            .map(|e| e.to_string());
        outcomes.push(DeliveryOutcome {
            reminder_id: reminder.id,
            error,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::ReminderStatus;
    use crate::notifications::transactional::EmailApiError;
    use std::sync::Mutex;

    /// Records what it was asked to send; rejects one address.
    #[derive(Default)]
    struct FakeSender {
        sent: Mutex<Vec<OutgoingEmail>>,
        reject: Option<String>,
    }

    #[async_trait]
    impl EmailSender for FakeSender {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailApiError> {
            if self.reject.as_deref() == Some(email.to.as_str()) {
                return Err(EmailApiError::Api {
                    status: 422,
                    message: "recipient blocked".to_string(),
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn reminder(to: &str) -> ReminderRow {
        ReminderRow {
            id: Uuid::new_v4(),
            student_id: None,
            recipient_email: to.to_string(),
            subject: "Weekly check-in".to_string(),
            body: "Log your applications.".to_string(),
            due_at: Utc::now(),
            status: ReminderStatus::Pending,
            claimed_at: None,
            sent_at: None,
            last_error: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_delivers_all_reminders() {
        let sender = FakeSender::default();
        let batch = vec![reminder("a@example.com"), reminder("b@example.com")];

        let outcomes = deliver_batch(&sender, &batch).await;

        assert!(outcomes.iter().all(DeliveryOutcome::is_sent));
        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].html, "<p>Log your applications.</p>");
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let sender = FakeSender {
            reject: Some("bad@example.com".to_string()),
            ..Default::default()
        };
        let batch = vec![
            reminder("bad@example.com"),
            reminder("ok@example.com"),
        ];

        let outcomes = deliver_batch(&sender, &batch).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].reminder_id, batch[0].id);
        assert!(outcomes[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("recipient blocked")));
        assert!(outcomes[1].is_sent());
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let sender = FakeSender::default();
        assert!(deliver_batch(&sender, &[]).await.is_empty());
    }

    /// Remembers what was recorded; the store rejects one id.
    #[derive(Default)]
    struct FakeRecorder {
        sent: Mutex<Vec<Uuid>>,
        failed: Mutex<Vec<(Uuid, String)>>,
        broken: Option<Uuid>,
    }

    impl FakeRecorder {
        fn check(&self, id: Uuid) -> Result<(), sqlx::Error> {
            if self.broken == Some(id) {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl OutcomeRecorder for FakeRecorder {
        async fn record_sent(&self, id: Uuid) -> Result<(), sqlx::Error> {
            self.check(id)?;
            self.sent.lock().unwrap().push(id);
            Ok(())
        }

        async fn record_failed(&self, id: Uuid, error: &str) -> Result<(), sqlx::Error> {
            self.check(id)?;
            self.failed.lock().unwrap().push((id, error.to_string()));
            Ok(())
        }
    }

    fn sent(id: Uuid) -> DeliveryOutcome {
        DeliveryOutcome {
            reminder_id: id,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_one_store_error_does_not_skip_later_outcomes() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let recorder = FakeRecorder {
            broken: Some(ids[0]),
            ..Default::default()
        };
        let outcomes: Vec<_> = ids.iter().copied().map(sent).collect();

        let summary = record_outcomes(&recorder, &outcomes).await;

        assert_eq!(
            summary,
            RecordSummary {
                sent: 2,
                failed: 0,
                unrecorded: 1,
            }
        );
        assert_eq!(*recorder.sent.lock().unwrap(), vec![ids[1], ids[2]]);
    }

    #[tokio::test]
    async fn test_failures_recorded_with_their_error() {
        let ok = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let recorder = FakeRecorder::default();
        let outcomes = vec![
            sent(ok),
            DeliveryOutcome {
                reminder_id: bad,
                error: Some("recipient blocked".to_string()),
            },
        ];

        let summary = record_outcomes(&recorder, &outcomes).await;

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        let failed = recorder.failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0], (bad, "recipient blocked".to_string()));
    }
}
