use super::bootstrap::{BOOTSTRAP_EPOCHS, BOOTSTRAP_SAMPLES, run_bootstrap};
use super::predictor::{LearnReport, OutcomeModel};
use crate::domain::errors::PersistenceError;
use crate::domain::journal::{TradeField, TradeFieldSource, TradeOutcome, TradeSources};
use crate::domain::ml::{FeatureEncoder, FeatureVector, WeightVector};
use crate::domain::repositories::WeightRepository;
use crate::infrastructure::observability::{LatencyGuard, PredictorMetrics};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Step size of every online update. Not decayed, not configurable.
pub const LEARNING_RATE: f64 = 0.1;

/// Single linear unit trained online with plain SGD.
///
/// One instance per process, shared behind an `Arc`. The weight mutex is held
/// across predict, update and the write-through save, so concurrent learners
/// never interleave their read-modify-write.
pub struct OnlinePredictor {
    weights: Mutex<WeightVector>,
    learning_rate: f64,
    repository: Arc<dyn WeightRepository>,
    encoder: FeatureEncoder,
    metrics: Option<PredictorMetrics>,
}

impl OnlinePredictor {
    /// Loads stored weights, or seeds and stores a bootstrap model when the
    /// repository is empty. Never fails.
    pub fn initialize(repository: Arc<dyn WeightRepository>) -> Self {
        Self::initialize_with(repository, FeatureEncoder::default(), None)
    }

    pub fn initialize_with(
        repository: Arc<dyn WeightRepository>,
        encoder: FeatureEncoder,
        metrics: Option<PredictorMetrics>,
    ) -> Self {
        let predictor = Self {
            weights: Mutex::new(WeightVector::DEFAULT),
            learning_rate: LEARNING_RATE,
            repository,
            encoder,
            metrics,
        };

        match predictor.load_weights() {
            Ok(true) => {
                info!(
                    "Loaded predictor weights from {}: {}",
                    predictor.repository.location(),
                    predictor.weights()
                );
            }
            Ok(false) => {
                info!(
                    "No stored weights at {}. Bootstrapping ({} epochs over {} samples)",
                    predictor.repository.location(),
                    BOOTSTRAP_EPOCHS,
                    BOOTSTRAP_SAMPLES.len()
                );
                let mut weights = predictor.lock();
                run_bootstrap(&mut weights, predictor.learning_rate);
                predictor.persist(&weights);
            }
            Err(e) => {
                warn!(
                    "Failed to load predictor weights: {}. Continuing with defaults.",
                    e
                );
                predictor.record_failure("load");
            }
        }

        predictor
    }

    fn lock(&self) -> MutexGuard<'_, WeightVector> {
        self.weights.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_failure(&self, operation: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_persistence_failure(operation);
        }
    }

    /// Writes `weights` to the repository, logging instead of failing.
    fn persist(&self, weights: &WeightVector) -> bool {
        match self.repository.save(weights) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to save predictor weights to {}: {}",
                    self.repository.location(),
                    e
                );
                self.record_failure("save");
                false
            }
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn metrics(&self) -> Option<&PredictorMetrics> {
        self.metrics.as_ref()
    }

    /// Snapshot of the current weights.
    pub fn weights(&self) -> WeightVector {
        *self.lock()
    }

    /// Runs the fixed bootstrap sweep on the current weights, in memory.
    pub fn bootstrap(&self) {
        let mut weights = self.lock();
        run_bootstrap(&mut weights, self.learning_rate);
    }

    /// Dot product of the weights and `features`. Unclamped.
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let _latency = self
            .metrics
            .as_ref()
            .map(|m| LatencyGuard::new(m.predict_latency_seconds.clone()));
        let score = self.lock().dot(features);
        if let Some(metrics) = &self.metrics {
            metrics.predictions_total.inc();
        }
        score
    }

    /// One SGD step toward `target`. Returns the prediction made before the
    /// update. Does not persist.
    pub fn learn_step(&self, features: &FeatureVector, target: f64) -> f64 {
        self.lock()
            .apply_gradient_step(features, target, self.learning_rate)
    }

    /// Learns from a completed record and persists the result immediately.
    ///
    /// Records without a result are ignored.
    pub fn learn_from_outcome(&self, record: &dyn TradeFieldSource) -> Option<LearnReport> {
        let sources = TradeSources::entry(record);
        let outcome = sources
            .lookup(TradeField::Result)
            .and_then(|value| value.as_text())
            .and_then(|label| TradeOutcome::parse(&label))?;

        let target = outcome.target();
        let features = self.encoder.encode(&sources);

        let mut weights = self.lock();
        let prediction_before = weights.apply_gradient_step(&features, target, self.learning_rate);
        let prediction_after = weights.dot(&features);
        let persisted = self.persist(&weights);
        let snapshot = *weights;
        drop(weights);

        if let Some(metrics) = &self.metrics {
            metrics.record_learn_step(outcome.label());
        }
        debug!(
            "Learned from '{}' outcome: prediction {:.4} -> {:.4} (target {:.1})",
            outcome, prediction_before, prediction_after, target
        );

        Some(LearnReport {
            outcome,
            target,
            features,
            prediction_before,
            prediction_after,
            weights: snapshot,
            persisted,
        })
    }

    /// Writes the current weights to the repository.
    pub fn save_weights(&self) -> Result<(), PersistenceError> {
        let weights = self.lock();
        self.repository.save(&weights)
    }

    /// Replaces the in-memory weights with stored ones.
    ///
    /// `Ok(false)` means nothing is stored; the current weights are kept.
    /// On error the current weights are kept as well.
    pub fn load_weights(&self) -> Result<bool, PersistenceError> {
        let mut weights = self.lock();
        match self.repository.load()? {
            Some(stored) => {
                *weights = stored;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Discards learned state: default weights, bootstrap sweep, save.
    pub fn reset(&self) -> Result<WeightVector, PersistenceError> {
        let mut weights = self.lock();
        *weights = WeightVector::DEFAULT;
        run_bootstrap(&mut weights, self.learning_rate);
        info!("Predictor weights reset to bootstrap prior: {}", *weights);
        self.repository.save(&weights)?;
        Ok(*weights)
    }
}

impl OutcomeModel for OnlinePredictor {
    fn encode(&self, sources: &TradeSources<'_>) -> FeatureVector {
        self.encoder.encode(sources)
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        OnlinePredictor::predict(self, features)
    }

    fn learn_from_outcome(&self, record: &dyn TradeFieldSource) -> Option<LearnReport> {
        OnlinePredictor::learn_from_outcome(self, record)
    }

    fn name(&self) -> &str {
        "Online Linear Predictor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::journal::{FieldValue, JournalEntry};
    use crate::infrastructure::InMemoryWeightRepository;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal_macros::dec;

    fn fresh_predictor() -> (OnlinePredictor, Arc<InMemoryWeightRepository>) {
        let repo = Arc::new(InMemoryWeightRepository::new());
        let predictor = OnlinePredictor::initialize_with(
            repo.clone(),
            FeatureEncoder::with_fixed_hour(14),
            None,
        );
        (predictor, repo)
    }

    fn breakout_entry(result: Option<&str>) -> JournalEntry {
        let mut entry = JournalEntry::new("XAUUSD");
        entry.entry_price = Some(dec!(2650.50));
        entry.stop_loss = Some(dec!(2645.00));
        entry.take_profit = Some(dec!(2660.00));
        entry.risk_reward = Some(2.0);
        entry.strategy = Some("Breakout".to_string());
        entry.result = result.map(str::to_string);
        entry
    }

    #[test]
    fn test_fresh_predictor_bootstraps_and_saves() {
        let (predictor, repo) = fresh_predictor();

        let mut expected = WeightVector::DEFAULT;
        run_bootstrap(&mut expected, LEARNING_RATE);

        assert_eq!(predictor.weights(), expected);
        assert_eq!(repo.stored(), Some(expected));
        assert_eq!(repo.save_count(), 1);
    }

    #[test]
    fn test_bootstrap_is_deterministic() {
        let (first, _) = fresh_predictor();
        let (second, _) = fresh_predictor();
        assert_eq!(first.weights(), second.weights());
    }

    #[test]
    fn test_stored_weights_skip_bootstrap() {
        let stored = WeightVector::new([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let repo = Arc::new(InMemoryWeightRepository::with_weights(stored));

        let predictor = OnlinePredictor::initialize(repo.clone());

        assert_eq!(predictor.weights(), stored);
        assert_eq!(repo.save_count(), 0);
    }

    #[test]
    fn test_explicit_bootstrap_sweep() {
        let repo = Arc::new(InMemoryWeightRepository::with_weights(WeightVector::DEFAULT));
        let predictor = OnlinePredictor::initialize(repo.clone());
        assert_eq!(predictor.weights(), WeightVector::DEFAULT);

        predictor.bootstrap();

        let (seeded, _) = fresh_predictor();
        assert_eq!(predictor.weights(), seeded.weights());
        // In memory only
        assert_eq!(repo.stored(), Some(WeightVector::DEFAULT));
    }

    #[test]
    fn test_predict_is_exact_dot_product() {
        let (predictor, _) = fresh_predictor();
        let features = FeatureVector::new([0.3, 0.1, 0.9, 0.4, 1.0, 0.25]);

        let w = predictor.weights();
        let expected = features
            .values()
            .iter()
            .zip(w.values().iter())
            .fold(0.0, |acc, (x, w)| acc + x * w);
        assert_eq!(predictor.predict(&features), expected);
    }

    #[test]
    fn test_breakout_score_against_default_weights() {
        let repo = Arc::new(InMemoryWeightRepository::with_weights(WeightVector::DEFAULT));
        let predictor = OnlinePredictor::initialize_with(
            repo,
            FeatureEncoder::with_fixed_hour(14),
            None,
        );
        let entry = breakout_entry(None);

        let features = predictor.encoder().encode(&TradeSources::entry(&entry));
        let score = predictor.predict(&features);

        assert!((score - 1.1746321448783248).abs() < 1e-12);
        // Repeatable
        assert_eq!(score, predictor.predict(&features));
    }

    #[test]
    fn test_learn_step_moves_prediction_toward_target() {
        let (predictor, _) = fresh_predictor();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let mut values = [0.0; 6];
            for v in values.iter_mut() {
                *v = rng.random::<f64>();
            }
            let features = FeatureVector::new(values);
            let target = if rng.random_bool(0.5) { 1.0 } else { 0.0 };

            let before = (target - predictor.predict(&features)).abs();
            predictor.learn_step(&features, target);
            let after = (target - predictor.predict(&features)).abs();

            assert!(after <= before + 1e-12, "error grew: {} -> {}", before, after);
        }
    }

    #[test]
    fn test_learn_step_delta_matches_update_rule() {
        let (predictor, _) = fresh_predictor();
        let features = FeatureVector::new([0.5, 0.2, 0.4, 0.4, 0.0, 0.8]);
        let before = predictor.weights();
        let prediction = predictor.predict(&features);

        predictor.learn_step(&features, 1.0);

        let after = predictor.weights();
        for i in 0..6 {
            let expected = LEARNING_RATE * (1.0 - prediction) * features.values()[i];
            let delta = after.values()[i] - before.values()[i];
            assert!((delta - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_learn_from_outcome_direction_per_label() {
        for (label, target) in [("win", 1.0), ("loss", 0.0), ("be", 0.5)] {
            let (predictor, repo) = fresh_predictor();
            let saves_before = repo.save_count();
            let entry = breakout_entry(Some(label));
            let weights_before = predictor.weights();

            let report = predictor.learn_from_outcome(&entry).unwrap();

            let (err_before, err_after) = report.error_change();
            assert!(err_after < err_before, "{}: {} -> {}", label, err_before, err_after);
            assert_eq!(report.target, target);
            assert!(report.persisted);
            assert_eq!(repo.save_count(), saves_before + 1);
            assert_eq!(repo.stored(), Some(predictor.weights()));

            let error = target - report.prediction_before;
            for i in 0..6 {
                let delta = report.weights.values()[i] - weights_before.values()[i];
                let x = report.features.values()[i];
                assert!((delta - LEARNING_RATE * error * x).abs() < 1e-12);
                if x > 0.0 {
                    assert_eq!(delta.signum(), error.signum());
                }
            }
        }
    }

    #[test]
    fn test_learn_without_outcome_is_noop() {
        let (predictor, repo) = fresh_predictor();
        let weights = predictor.weights();
        let saves = repo.save_count();

        assert!(predictor.learn_from_outcome(&breakout_entry(None)).is_none());
        assert!(predictor.learn_from_outcome(&breakout_entry(Some("  "))).is_none());

        assert_eq!(predictor.weights(), weights);
        assert_eq!(repo.save_count(), saves);
    }

    #[test]
    fn test_unknown_label_trains_toward_zero() {
        let (predictor, _) = fresh_predictor();
        let report = predictor
            .learn_from_outcome(&breakout_entry(Some("scratched")))
            .unwrap();
        assert_eq!(report.target, 0.0);
        assert!(report.prediction_after < report.prediction_before);
    }

    #[test]
    fn test_failed_save_keeps_in_memory_update() {
        let (predictor, repo) = fresh_predictor();
        let stored_before = repo.stored();
        repo.set_fail_saves(true);

        let report = predictor
            .learn_from_outcome(&breakout_entry(Some("win")))
            .unwrap();

        assert!(!report.persisted);
        assert_eq!(predictor.weights(), report.weights);
        assert_ne!(predictor.weights(), stored_before.unwrap());
        assert_eq!(repo.stored(), stored_before);
    }

    #[test]
    fn test_save_then_load_restores_weights() {
        let (predictor, _) = fresh_predictor();
        predictor.learn_step(&FeatureVector::new([1.0; 6]), 0.0);
        let trained = predictor.weights();

        predictor.save_weights().unwrap();
        predictor.learn_step(&FeatureVector::new([1.0; 6]), 1.0);
        assert!(predictor.load_weights().unwrap());

        assert_eq!(predictor.weights(), trained);
    }

    #[test]
    fn test_reset_restores_bootstrap_prior() {
        let (predictor, repo) = fresh_predictor();
        let prior = predictor.weights();
        predictor.learn_from_outcome(&breakout_entry(Some("loss")));
        assert_ne!(predictor.weights(), prior);

        let reset = predictor.reset().unwrap();

        assert_eq!(reset, prior);
        assert_eq!(repo.stored(), Some(prior));
    }

    #[test]
    fn test_metrics_are_recorded() {
        let repo = Arc::new(InMemoryWeightRepository::new());
        let metrics = PredictorMetrics::new().unwrap();
        let predictor = OnlinePredictor::initialize_with(
            repo.clone(),
            FeatureEncoder::with_fixed_hour(9),
            Some(metrics.clone()),
        );

        predictor.predict(&FeatureVector::new([0.5; 6]));
        predictor.learn_from_outcome(&breakout_entry(Some("win")));
        repo.set_fail_saves(true);
        predictor.learn_from_outcome(&breakout_entry(Some("be")));

        assert_eq!(metrics.predictions_total.get(), 1);
        assert_eq!(metrics.predict_latency_seconds.get_sample_count(), 1);
        assert_eq!(metrics.learn_steps_total.with_label_values(&["win"]).get(), 1.0);
        assert_eq!(metrics.learn_steps_total.with_label_values(&["be"]).get(), 1.0);
        assert_eq!(
            metrics
                .persistence_failures_total
                .with_label_values(&["save"])
                .get(),
            1.0
        );
    }

    #[test]
    fn test_result_read_through_field_source() {
        struct OnlyResult;
        impl TradeFieldSource for OnlyResult {
            fn field(&self, field: TradeField) -> Option<FieldValue> {
                (field == TradeField::Result).then(|| FieldValue::Text("Win".into()))
            }
        }

        let (predictor, _) = fresh_predictor();
        let report = predictor.learn_from_outcome(&OnlyResult).unwrap();
        assert_eq!(report.outcome, TradeOutcome::Win);
        // Neutral fallbacks, fixed hour 14
        assert_eq!(
            report.features.values(),
            &[14.0 / 24.0, 0.5, 0.5, 0.5, 0.0, 0.5]
        );
    }
}
