//! Prometheus metrics definitions for the journal predictor
//!
//! All metrics use the `journal_predictor_` prefix and live on a private
//! registry. Nothing is served over HTTP; `encode_text` renders a snapshot.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the predictor
#[derive(Clone)]
pub struct PredictorMetrics {
    registry: Arc<Registry>,
    /// Raw predictions served
    pub predictions_total: IntCounter,
    /// Online learning steps by outcome label
    pub learn_steps_total: CounterVec,
    /// Failed load/save attempts by operation
    pub persistence_failures_total: CounterVec,
    /// Most recent clamped confidence handed to the journal
    pub last_confidence: GenericGauge<AtomicF64>,
    /// Time spent in predict, seconds
    pub predict_latency_seconds: Histogram,
}

impl PredictorMetrics {
    /// Create a new instance with all counters and gauges registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = IntCounter::with_opts(Opts::new(
            "journal_predictor_predictions_total",
            "Total raw predictions computed",
        ))?;
        registry.register(Box::new(predictions_total.clone()))?;

        let learn_steps_total = CounterVec::new(
            Opts::new(
                "journal_predictor_learn_steps_total",
                "Online learning steps by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(learn_steps_total.clone()))?;

        let persistence_failures_total = CounterVec::new(
            Opts::new(
                "journal_predictor_persistence_failures_total",
                "Weight persistence failures by operation",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(persistence_failures_total.clone()))?;

        let last_confidence = Gauge::with_opts(Opts::new(
            "journal_predictor_last_confidence",
            "Last clamped confidence score (0-1)",
        ))?;
        registry.register(Box::new(last_confidence.clone()))?;

        let predict_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "journal_predictor_predict_latency_seconds",
                "Predict call latency in seconds",
            )
            .buckets(vec![1e-7, 1e-6, 1e-5, 1e-4, 1e-3, 1e-2]),
        )?;
        registry.register(Box::new(predict_latency_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            learn_steps_total,
            persistence_failures_total,
            last_confidence,
            predict_latency_seconds,
        })
    }

    pub fn record_learn_step(&self, outcome: &str) {
        self.learn_steps_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_persistence_failure(&self, operation: &str) {
        self.persistence_failures_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn encode_text(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        Ok(encoder.encode_to_string(&families)?)
    }
}
