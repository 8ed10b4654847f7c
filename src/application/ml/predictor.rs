use crate::domain::journal::{TradeFieldSource, TradeOutcome, TradeSources};
use crate::domain::ml::{FeatureVector, WeightVector};

/// Interface for the trade-outcome model used by the journal
pub trait OutcomeModel: Send + Sync {
    /// Encode draft/entry fields into the model's input layout
    fn encode(&self, sources: &TradeSources<'_>) -> FeatureVector;

    /// Raw, unclamped score. Callers clamp to [0, 1] before display.
    fn predict(&self, features: &FeatureVector) -> f64;

    /// One online update from a record with a known result.
    /// Returns `None` when the record has no outcome.
    fn learn_from_outcome(&self, record: &dyn TradeFieldSource) -> Option<LearnReport>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// What a single learning step did, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnReport {
    pub outcome: TradeOutcome,
    pub target: f64,
    pub features: FeatureVector,
    pub prediction_before: f64,
    pub prediction_after: f64,
    pub weights: WeightVector,
    /// False when the updated weights could not be written to storage.
    pub persisted: bool,
}

impl LearnReport {
    /// Absolute error before and after the step.
    pub fn error_change(&self) -> (f64, f64) {
        (
            (self.target - self.prediction_before).abs(),
            (self.target - self.prediction_after).abs(),
        )
    }
}
