//! Glue between journal workflows and the outcome model.
//!
//! Scoring and learning are best effort: nothing here returns an error, so a
//! journal entry is always saved even when the model misbehaves.

use crate::application::ml::{LearnReport, OutcomeModel};
use crate::domain::journal::{Confidence, JournalEntry, TradeDraft, TradeSources};
use crate::infrastructure::observability::PredictorMetrics;
use std::sync::Arc;
use tracing::{debug, info};

pub struct JournalAiService {
    model: Arc<dyn OutcomeModel>,
    metrics: Option<PredictorMetrics>,
}

impl JournalAiService {
    pub fn new(model: Arc<dyn OutcomeModel>) -> Self {
        Self {
            model,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PredictorMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn confidence_for(&self, sources: &TradeSources<'_>) -> Confidence {
        let features = self.model.encode(sources);
        let raw = self.model.predict(&features);
        let confidence = Confidence::from_score(raw);
        if let Some(metrics) = &self.metrics {
            metrics.last_confidence.set(confidence.value());
        }
        debug!(
            "{} scored {:.4} (clamped {:.4}) for [{}]",
            self.model.name(),
            raw,
            confidence.value(),
            features
        );
        confidence
    }

    /// Confidence for a trade the user is about to log.
    pub fn score_draft(&self, draft: &TradeDraft) -> Confidence {
        self.confidence_for(&TradeSources::draft(draft))
    }

    /// Confidence for a draft, with a saved entry filling in missing fields.
    pub fn score_draft_with_entry(&self, draft: &TradeDraft, entry: &JournalEntry) -> Confidence {
        self.confidence_for(&TradeSources::new(Some(draft), Some(entry)))
    }

    /// New-entry workflow: score, store the confidence on the entry, and learn
    /// right away when the entry is already closed (e.g. a historical trade).
    pub fn record_entry(&self, entry: &mut JournalEntry) -> Confidence {
        let confidence = self.confidence_for(&TradeSources::entry(&*entry));
        entry.ai_confidence = Some(confidence.value());

        if let Some(report) = self.model.learn_from_outcome(&*entry) {
            log_learning(entry, &report);
        }

        info!(
            "Journal entry {} ({}) recorded. AI Trade Confidence: {}",
            entry.id, entry.pair, confidence
        );
        confidence
    }

    /// Closes a previously recorded entry with its result and learns from it.
    pub fn complete_entry(&self, entry: &mut JournalEntry, result: &str) -> Option<LearnReport> {
        entry.result = Some(result.trim().to_string()).filter(|r| !r.is_empty());
        let report = self.model.learn_from_outcome(&*entry)?;
        log_learning(entry, &report);
        Some(report)
    }
}

fn log_learning(entry: &JournalEntry, report: &LearnReport) {
    info!(
        "Learned from entry {} ({}): outcome={}, prediction {:.4} -> {:.4}, persisted={}",
        entry.id,
        entry.pair,
        report.outcome,
        report.prediction_before,
        report.prediction_after,
        report.persisted
    );
}
