use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of model inputs. Weights and features always have this length.
pub const FEATURE_COUNT: usize = 6;

/// Ordered list of feature names.
/// Positions are fixed: persisted weight files depend on this order.
/// Any change here is a breaking change for stored models.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "time_of_day",
    "stop_loss_distance",
    "take_profit_distance",
    "risk_reward",
    "news_event",
    "strategy_id",
];

pub const TIME_OF_DAY: usize = 0;
pub const STOP_LOSS_DISTANCE: usize = 1;
pub const TAKE_PROFIT_DISTANCE: usize = 2;
pub const RISK_REWARD: usize = 3;
pub const NEWS_EVENT: usize = 4;
pub const STRATEGY_ID: usize = 5;

/// Encoded model input, positionally aligned with [`WeightVector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_named(f, &self.0)
    }
}

/// Learned coefficients of the linear model.
///
/// Serialized as a bare JSON array of six numbers. Arrays of any other
/// length are rejected on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector([f64; FEATURE_COUNT]);

impl WeightVector {
    /// Prior used before any training has happened.
    pub const DEFAULT: WeightVector = WeightVector([0.5, 0.5, 0.5, 0.5, -0.5, 0.5]);

    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Dot product with a feature vector, accumulated left to right.
    pub fn dot(&self, features: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(features.values().iter())
            .fold(0.0, |acc, (w, x)| acc + x * w)
    }

    /// One stochastic gradient step for squared error:
    /// `w[i] += learning_rate * (target - w·x) * x[i]`.
    ///
    /// Returns the prediction made before the update.
    pub fn apply_gradient_step(
        &mut self,
        features: &FeatureVector,
        target: f64,
        learning_rate: f64,
    ) -> f64 {
        let prediction = self.dot(features);
        let error = target - prediction;
        for (w, x) in self.0.iter_mut().zip(features.values().iter()) {
            *w += learning_rate * error * x;
        }
        prediction
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_named(f, &self.0)
    }
}

fn write_named(f: &mut fmt::Formatter<'_>, values: &[f64; FEATURE_COUNT]) -> fmt::Result {
    for (i, (name, value)) in FEATURE_NAMES.iter().zip(values.iter()).enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={:.4}", name, value)?;
    }
    Ok(())
}
