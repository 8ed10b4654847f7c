//! Heuristic mapping of journal fields to the model's feature vector.
//!
//! Every dimension is computed independently and has its own fallback, so
//! encoding never fails: missing, blank or malformed fields degrade to a
//! neutral value instead of an error.

use super::feature_registry::{
    FEATURE_COUNT, FeatureVector, NEWS_EVENT, RISK_REWARD, STOP_LOSS_DISTANCE, STRATEGY_ID,
    TAKE_PROFIT_DISTANCE, TIME_OF_DAY,
};
use crate::domain::journal::{TradeField, TradeSources};
use chrono::Timelike;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Value used for price, ratio and strategy dimensions when input is missing.
pub const NEUTRAL_FEATURE: f64 = 0.5;

/// Risk:reward ratios at or above this map to 1.0.
pub const MAX_RISK_REWARD: f64 = 5.0;

/// Supplies the hour used when a record carries no timestamp.
pub trait HourSource: Send + Sync {
    fn current_hour(&self) -> u32;
}

/// Local wall-clock hour.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHourSource;

impl HourSource for SystemHourSource {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Always returns the same hour. Used by tests and replay tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedHourSource(pub u32);

impl HourSource for FixedHourSource {
    fn current_hour(&self) -> u32 {
        self.0 % 24
    }
}

#[derive(Clone)]
pub struct FeatureEncoder {
    hours: Arc<dyn HourSource>,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new(Arc::new(SystemHourSource))
    }
}

impl std::fmt::Debug for FeatureEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureEncoder").finish_non_exhaustive()
    }
}

impl FeatureEncoder {
    pub fn new(hours: Arc<dyn HourSource>) -> Self {
        Self { hours }
    }

    /// Encoder whose timestamp fallback is pinned to `hour`.
    pub fn with_fixed_hour(hour: u32) -> Self {
        Self::new(Arc::new(FixedHourSource(hour)))
    }

    pub fn encode(&self, sources: &TradeSources<'_>) -> FeatureVector {
        let mut features = [0.0; FEATURE_COUNT];

        features[TIME_OF_DAY] = self.time_of_day(sources);

        let entry_price = sources.lookup_number(TradeField::EntryPrice);
        features[STOP_LOSS_DISTANCE] =
            price_distance(entry_price, sources.lookup_number(TradeField::StopLoss));
        features[TAKE_PROFIT_DISTANCE] =
            price_distance(entry_price, sources.lookup_number(TradeField::TakeProfit));

        features[RISK_REWARD] = sources
            .lookup_number(TradeField::RiskReward)
            .map(|rr| (rr / MAX_RISK_REWARD).min(1.0))
            .unwrap_or(NEUTRAL_FEATURE);

        features[NEWS_EVENT] = match sources.lookup(TradeField::NewsEvent) {
            Some(value) if value.is_truthy() => 1.0,
            _ => 0.0,
        };

        features[STRATEGY_ID] = sources
            .lookup(TradeField::Strategy)
            .and_then(|value| value.as_text())
            .map(|label| strategy_id(&label))
            .unwrap_or(NEUTRAL_FEATURE);

        // Division by tiny prices can overflow; keep every dimension usable.
        for value in features.iter_mut() {
            if !value.is_finite() {
                *value = NEUTRAL_FEATURE;
            }
        }

        FeatureVector::new(features)
    }

    fn time_of_day(&self, sources: &TradeSources<'_>) -> f64 {
        let hour = sources
            .lookup(TradeField::Date)
            .and_then(|value| value.as_hour())
            .unwrap_or_else(|| self.hours.current_hour());
        f64::from(hour) / 24.0
    }
}

/// `min(|entry - other| / entry * 100, 1.0)`, or neutral when undefined.
fn price_distance(entry_price: Option<f64>, other: Option<f64>) -> f64 {
    match (entry_price, other) {
        (Some(entry), Some(other)) if entry != 0.0 => {
            ((entry - other).abs() / entry * 100.0).min(1.0)
        }
        _ => NEUTRAL_FEATURE,
    }
}

/// Stable numeric identity for a strategy label, in `[0, 1)`.
///
/// SHA-256 of the label bytes, first 8 bytes as big-endian `u64`, mod 100.
pub fn strategy_id(label: &str) -> f64 {
    let digest = Sha256::digest(label.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % 100) as f64 / 100.0
}
