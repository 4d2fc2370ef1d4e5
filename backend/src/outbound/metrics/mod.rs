//! Prometheus-backed implementations of domain metrics ports.
//!
//! Compiled only with the `metrics` feature.

mod prometheus_dispatch;

pub use prometheus_dispatch::PrometheusDispatchMetrics;
