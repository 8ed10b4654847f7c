use crate::domain::ml::{FeatureVector, WeightVector};

/// Full passes over [`BOOTSTRAP_SAMPLES`] when seeding a fresh model.
pub const BOOTSTRAP_EPOCHS: usize = 20;

/// Labelled seed rows: (time, sl, tp, rr, news, strategy) -> target.
pub const BOOTSTRAP_SAMPLES: [([f64; 6], f64); 5] = [
    // good London session trade
    ([0.8, 0.2, 0.6, 0.7, 0.0, 0.8], 1.0),
    // bad news trade
    ([0.3, 0.6, 0.4, 0.3, 1.0, 0.4], 0.0),
    ([0.9, 0.3, 0.7, 0.8, 0.0, 0.9], 1.0),
    ([0.2, 0.7, 0.3, 0.2, 1.0, 0.3], 0.0),
    ([0.7, 0.4, 0.6, 0.6, 0.0, 0.7], 1.0),
];

/// Runs the fixed bootstrap sweep over `weights`, in listed order.
pub fn run_bootstrap(weights: &mut WeightVector, learning_rate: f64) {
    for _ in 0..BOOTSTRAP_EPOCHS {
        for (features, target) in BOOTSTRAP_SAMPLES.iter() {
            weights.apply_gradient_step(&FeatureVector::new(*features), *target, learning_rate);
        }
    }
}
