//! PostgreSQL-backed `NotificationOutbox`.
//!
//! `status` moves from `pending` to either `sent` or `abandoned`; only
//! pending rows whose `next_attempt_at` has passed are claimed. A single
//! dispatcher drains the table, so claims take no row locks. Both terminal
//! transitions overwrite `body`, which may hold a generated password.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use zeroize::Zeroizing;

use crate::domain::ports::{NotificationOutbox, NotificationOutboxError};
use crate::domain::{OutboxMessage, OutboxMessageId, OutgoingEmail, REDACTED_BODY};

use super::error_mapping::{classify, impl_from_store_failure, pool_failure};
use super::models::{NewOutboxRow, OutboxRow};
use super::pool::{DbPool, PoolError};
use super::schema::notification_outbox;

impl_from_store_failure!(NotificationOutboxError);

const STATUS_PENDING: &str = "pending";
const STATUS_SENT: &str = "sent";
const STATUS_ABANDONED: &str = "abandoned";

/// Diesel implementation of [`NotificationOutbox`].
#[derive(Clone)]
pub struct DieselNotificationOutbox {
    pool: DbPool,
}

impl DieselNotificationOutbox {
    /// Create an outbox over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_error(error: diesel::result::Error) -> NotificationOutboxError {
    classify(error).into()
}

fn pool_error(error: PoolError) -> NotificationOutboxError {
    pool_failure(error).into()
}

fn row_to_message(row: OutboxRow) -> OutboxMessage {
    OutboxMessage {
        id: OutboxMessageId::new(row.id),
        email: OutgoingEmail {
            sender: row.sender,
            recipient: row.recipient,
            subject: row.subject,
            body: Zeroizing::new(row.body),
        },
        attempts: u32::try_from(row.attempts).unwrap_or(0),
        last_error: row.last_error,
        created_at: row.created_at,
        next_attempt_at: row.next_attempt_at,
    }
}

fn ensure_updated(id: OutboxMessageId, affected: usize) -> Result<(), NotificationOutboxError> {
    if affected == 0 {
        return Err(NotificationOutboxError::query(format!("outbox message {id} not found")));
    }
    Ok(())
}

#[async_trait]
impl NotificationOutbox for DieselNotificationOutbox {
    async fn enqueue(&self, email: &OutgoingEmail) -> Result<OutboxMessageId, NotificationOutboxError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id: i64 = diesel::insert_into(notification_outbox::table)
            .values(&NewOutboxRow {
                sender: email.sender.as_str(),
                recipient: email.recipient.as_str(),
                subject: email.subject.as_str(),
                body: email.body.as_str(),
            })
            .returning(notification_outbox::id)
            .get_result(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(OutboxMessageId::new(id))
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxMessage>, NotificationOutboxError> {
        let limit = i64::try_from(limit)
            .map_err(|_| NotificationOutboxError::query("claim limit exceeds i64 range"))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<OutboxRow> = notification_outbox::table
            .filter(notification_outbox::status.eq(STATUS_PENDING))
            .filter(notification_outbox::next_attempt_at.le(now))
            .order((notification_outbox::created_at, notification_outbox::id))
            .limit(limit)
            .select(OutboxRow::as_select())
            .load(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(row_to_message).collect())
    }

    async fn mark_sent(&self, id: OutboxMessageId, at: DateTime<Utc>) -> Result<(), NotificationOutboxError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::update(notification_outbox::table.find(id.get()))
            .set((
                notification_outbox::status.eq(STATUS_SENT),
                notification_outbox::attempts.eq(notification_outbox::attempts + 1),
                notification_outbox::sent_at.eq(Some(at)),
                notification_outbox::body.eq(REDACTED_BODY),
            ))
            .execute(&mut conn)
            .await
            .map_err(store_error)?;
        ensure_updated(id, affected)
    }

    async fn mark_failed(
        &self,
        id: OutboxMessageId,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationOutboxError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = notification_outbox::table.find(id.get());
        let bump = (
            notification_outbox::attempts.eq(notification_outbox::attempts + 1),
            notification_outbox::last_error.eq(Some(error)),
        );
        let affected = match next_attempt_at {
            Some(at) => diesel::update(target)
                .set((bump, notification_outbox::next_attempt_at.eq(at)))
                .execute(&mut conn)
                .await,
            None => diesel::update(target)
                .set((
                    bump,
                    notification_outbox::status.eq(STATUS_ABANDONED),
                    notification_outbox::body.eq(REDACTED_BODY),
                ))
                .execute(&mut conn)
                .await,
        }
        .map_err(store_error)?;
        ensure_updated(id, affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_attempt_counts_and_errors() {
        let now = Utc::now();
        let message = row_to_message(OutboxRow {
            id: 4,
            sender: "fleet@umd.edu".into(),
            recipient: "driver@umd.edu".into(),
            subject: "s".into(),
            body: "b".into(),
            attempts: 2,
            last_error: Some("relay down".into()),
            created_at: now,
            next_attempt_at: now,
        });
        assert_eq!(message.id, OutboxMessageId::new(4));
        assert_eq!(message.attempts, 2);
        assert_eq!(message.last_error.as_deref(), Some("relay down"));
    }

    #[test]
    fn missing_rows_are_reported() {
        assert!(ensure_updated(OutboxMessageId::new(1), 0).is_err());
        assert!(ensure_updated(OutboxMessageId::new(1), 1).is_ok());
    }
}
