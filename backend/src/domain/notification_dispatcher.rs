//! Background delivery of queued email.
//!
//! The dispatcher claims due outbox messages, hands each to the [`Mailer`]
//! and records the outcome. Failed deliveries are rescheduled with
//! exponential backoff (`base * 2^(attempt - 1)`, capped) until the attempt
//! budget is spent, after which the message is abandoned.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{debug, error, info, warn};

use super::OutboxMessage;
use super::ports::{
    DeliveryOutcome, DispatchMetrics, Mailer, NoOpDispatchMetrics, NotificationOutbox,
    NotificationOutboxError,
};

/// Retry and batching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Messages claimed per pass.
    pub batch_size: usize,
    /// Total delivery attempts before a message is abandoned.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub base_backoff: Duration,
    /// Upper bound on any single delay.
    pub max_backoff: Duration,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: 25,
            max_attempts: 5,
            base_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(60 * 60),
        }
    }
}

impl DispatchPolicy {
    /// Delay before retrying after failed attempt number `attempt` (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use shuttle_backend::domain::DispatchPolicy;
    ///
    /// let policy = DispatchPolicy::default();
    /// assert_eq!(policy.backoff_after(1), Duration::from_secs(30));
    /// assert_eq!(policy.backoff_after(3), Duration::from_secs(120));
    /// assert_eq!(policy.backoff_after(30), Duration::from_secs(3600));
    /// ```
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        2_u32
            .checked_pow(exponent)
            .and_then(|factor| self.base_backoff.checked_mul(factor))
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }
}

/// Counters from one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Delivered and marked sent.
    pub sent: usize,
    /// Failed and scheduled for another attempt.
    pub rescheduled: usize,
    /// Failed on the final attempt.
    pub abandoned: usize,
}

/// Drains the notification outbox.
#[derive(Clone)]
pub struct NotificationDispatcher {
    outbox: Arc<dyn NotificationOutbox>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    policy: DispatchPolicy,
    metrics: Arc<dyn DispatchMetrics>,
}

impl NotificationDispatcher {
    /// Build a dispatcher.
    pub fn new(
        outbox: Arc<dyn NotificationOutbox>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            outbox,
            mailer,
            clock,
            policy,
            metrics: Arc::new(NoOpDispatchMetrics),
        }
    }

    /// Report each delivery outcome to `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn DispatchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    async fn observe(&self, outcome: DeliveryOutcome) {
        if let Err(err) = self.metrics.record(outcome).await {
            warn!(error = %err, outcome = outcome.as_str(), "failed to record dispatch metric");
        }
    }

    /// Deliver every message due now, up to one batch.
    pub async fn dispatch_due(&self) -> Result<DispatchReport, NotificationOutboxError> {
        let now = self.clock.utc();
        let batch = self.outbox.claim_due(now, self.policy.batch_size).await?;
        let mut report = DispatchReport::default();
        for message in batch {
            self.deliver(message, &mut report).await?;
        }
        if report != DispatchReport::default() {
            info!(
                sent = report.sent,
                rescheduled = report.rescheduled,
                abandoned = report.abandoned,
                "outbox dispatch pass finished"
            );
        }
        Ok(report)
    }

    async fn deliver(
        &self,
        message: OutboxMessage,
        report: &mut DispatchReport,
    ) -> Result<(), NotificationOutboxError> {
        match self.mailer.send(&message.email).await {
            Ok(()) => {
                self.outbox.mark_sent(message.id, self.clock.utc()).await?;
                debug!(message_id = %message.id, recipient = %message.email.recipient, "email delivered");
                report.sent += 1;
                self.observe(DeliveryOutcome::Sent).await;
            }
            Err(failure) => {
                let attempt = message.attempts.saturating_add(1);
                let reason = failure.to_string();
                if attempt >= self.policy.max_attempts {
                    self.outbox.mark_failed(message.id, &reason, None).await?;
                    error!(
                        message_id = %message.id,
                        recipient = %message.email.recipient,
                        attempt,
                        error = %reason,
                        "email abandoned after final attempt"
                    );
                    report.abandoned += 1;
                    self.observe(DeliveryOutcome::Abandoned).await;
                } else {
                    let next = retry_at(self.clock.utc(), self.policy.backoff_after(attempt));
                    self.outbox.mark_failed(message.id, &reason, Some(next)).await?;
                    warn!(
                        message_id = %message.id,
                        attempt,
                        next_attempt_at = %next,
                        error = %reason,
                        "email delivery failed; rescheduled"
                    );
                    report.rescheduled += 1;
                    self.observe(DeliveryOutcome::Rescheduled).await;
                }
            }
        }
        Ok(())
    }

    /// Poll the outbox every `interval` until the task is aborted.
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!(interval_secs = interval.as_secs(), "notification dispatcher started");
        loop {
            ticker.tick().await;
            if let Err(err) = self.dispatch_due().await {
                error!(error = %err, "outbox dispatch pass failed");
            }
        }
    }
}

fn retry_at(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(delay)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(now)
}
