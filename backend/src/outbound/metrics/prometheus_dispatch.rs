//! Prometheus adapter for outbox delivery counters.

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{DeliveryOutcome, DispatchMetrics, DispatchMetricsError};

/// Counter family name exposed on `/metrics`.
pub const DELIVERIES_TOTAL: &str = "shuttle_outbox_deliveries_total";

/// Prometheus-backed recorder for notification delivery outcomes.
pub struct PrometheusDispatchMetrics {
    deliveries_total: CounterVec,
}

impl PrometheusDispatchMetrics {
    /// Create the counter and register it with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error when Prometheus rejects metric registration.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let deliveries_total = CounterVec::new(
            Opts::new(DELIVERIES_TOTAL, "Credential email delivery attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(deliveries_total.clone()))?;
        Ok(Self { deliveries_total })
    }
}

#[async_trait]
impl DispatchMetrics for PrometheusDispatchMetrics {
    async fn record(&self, outcome: DeliveryOutcome) -> Result<(), DispatchMetricsError> {
        self.deliveries_total
            .get_metric_with_label_values(&[outcome.as_str()])
            .map_err(|err| DispatchMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
