//! In-memory notification outbox.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use zeroize::Zeroizing;

use crate::domain::ports::{NotificationOutbox, NotificationOutboxError};
use crate::domain::{OutboxMessage, OutboxMessageId, OutgoingEmail, REDACTED_BODY};

/// Delivery state of an outbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxState {
    /// Waiting for (another) delivery attempt.
    Pending,
    /// Delivered.
    Sent,
    /// Gave up after the final attempt.
    Abandoned,
}

/// Snapshot of one stored message, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    /// The message as the dispatcher would claim it.
    pub message: OutboxMessage,
    /// Current state.
    pub state: OutboxState,
    /// Delivery time once sent.
    pub sent_at: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    fn redact(&mut self) {
        self.message.email.body = Zeroizing::new(REDACTED_BODY.to_owned());
    }
}

#[derive(Debug, Default)]
struct OutboxTable {
    last_id: i64,
    rows: BTreeMap<OutboxMessageId, OutboxEntry>,
}

/// Outbox held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryNotificationOutbox {
    table: RwLock<OutboxTable>,
}

impl InMemoryNotificationOutbox {
    /// Create an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored entry in insertion order.
    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.table.read().await.rows.values().cloned().collect()
    }

    async fn with_entry<F>(&self, id: OutboxMessageId, update: F) -> Result<(), NotificationOutboxError>
    where
        F: FnOnce(&mut OutboxEntry) + Send,
    {
        let mut table = self.table.write().await;
        let entry = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| NotificationOutboxError::query(format!("outbox message {id} not found")))?;
        update(entry);
        Ok(())
    }
}

#[async_trait]
impl NotificationOutbox for InMemoryNotificationOutbox {
    async fn enqueue(&self, email: &OutgoingEmail) -> Result<OutboxMessageId, NotificationOutboxError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = OutboxMessageId::new(table.last_id);
        let now = Utc::now();
        table.rows.insert(
            id,
            OutboxEntry {
                message: OutboxMessage {
                    id,
                    email: email.clone(),
                    attempts: 0,
                    last_error: None,
                    created_at: now,
                    next_attempt_at: now,
                },
                state: OutboxState::Pending,
                sent_at: None,
            },
        );
        Ok(id)
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxMessage>, NotificationOutboxError> {
        let table = self.table.read().await;
        let mut due: Vec<OutboxMessage> = table
            .rows
            .values()
            .filter(|entry| entry.state == OutboxState::Pending && entry.message.next_attempt_at <= now)
            .map(|entry| entry.message.clone())
            .collect();
        due.sort_by_key(|message| (message.created_at, message.id));
        due.truncate(limit);
        Ok(due)
    }

    async fn mark_sent(&self, id: OutboxMessageId, at: DateTime<Utc>) -> Result<(), NotificationOutboxError> {
        self.with_entry(id, |entry| {
            entry.message.attempts = entry.message.attempts.saturating_add(1);
            entry.state = OutboxState::Sent;
            entry.sent_at = Some(at);
            entry.redact();
        })
        .await
    }

    async fn mark_failed(
        &self,
        id: OutboxMessageId,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationOutboxError> {
        let error = error.to_owned();
        self.with_entry(id, move |entry| {
            entry.message.attempts = entry.message.attempts.saturating_add(1);
            entry.message.last_error = Some(error);
            match next_attempt_at {
                Some(at) => entry.message.next_attempt_at = at,
                None => {
                    entry.state = OutboxState::Abandoned;
                    entry.redact();
                }
            }
        })
        .await
    }
}
