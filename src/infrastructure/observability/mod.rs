//! Push-based observability for the predictor
//!
//! Metrics are collected on a private prometheus registry and only ever
//! rendered outward (log line or CLI output). There is no listening socket.

pub mod latency_tracker;
pub mod metrics;

pub use latency_tracker::LatencyGuard;
pub use metrics::PredictorMetrics;
