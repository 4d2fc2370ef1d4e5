//! Driven port recording outbox delivery outcomes.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by metrics exporters.
    pub enum DispatchMetricsError {
        /// The exporter rejected the write.
        Export { message: String } => "dispatch metrics exporter failed: {message}",
    }
}

/// Final or interim outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The relay accepted the message.
    Sent,
    /// The attempt failed and another is scheduled.
    Rescheduled,
    /// The final attempt failed.
    Abandoned,
}

impl DeliveryOutcome {
    /// Label value used by exporters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Rescheduled => "rescheduled",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Counts delivery attempts by outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchMetrics: Send + Sync {
    /// Record one attempt.
    async fn record(&self, outcome: DeliveryOutcome) -> Result<(), DispatchMetricsError>;
}

/// Discards every record; used when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDispatchMetrics;

#[async_trait]
impl DispatchMetrics for NoOpDispatchMetrics {
    async fn record(&self, _outcome: DeliveryOutcome) -> Result<(), DispatchMetricsError> {
        Ok(())
    }
}
