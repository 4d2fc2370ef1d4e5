//! Driven port for the durable email outbox.
//!
//! Messages are written by request handlers and drained by the background
//! dispatcher. A message is pending until it is either marked sent or
//! abandoned after its final failed attempt. Leaving the pending state
//! replaces the stored body with [`REDACTED_BODY`], so a delivered password
//! does not outlive its delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{OutboxMessage, OutboxMessageId, OutgoingEmail};
#[cfg(doc)]
use crate::domain::REDACTED_BODY;

use super::define_port_error;

define_port_error! {
    /// Errors raised by outbox adapters.
    pub enum NotificationOutboxError {
        /// The store could not be reached.
        Connection { message: String } => "notification outbox connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "notification outbox query failed: {message}",
    }
}

/// Durable queue of outgoing email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    /// Persist a pending message due immediately.
    async fn enqueue(&self, email: &OutgoingEmail) -> Result<OutboxMessageId, NotificationOutboxError>;

    /// Up to `limit` pending messages due at `now`, oldest first.
    ///
    /// Claiming does not lock; a single dispatcher is assumed.
    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxMessage>, NotificationOutboxError>;

    /// Record a successful delivery at `at` and redact the body.
    async fn mark_sent(&self, id: OutboxMessageId, at: DateTime<Utc>) -> Result<(), NotificationOutboxError>;

    /// Record a failed attempt.
    ///
    /// `next_attempt_at` reschedules the message; `None` abandons it and
    /// redacts the body.
    async fn mark_failed(
        &self,
        id: OutboxMessageId,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationOutboxError>;
}
