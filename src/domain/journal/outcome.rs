use serde::{Deserialize, Serialize};
use std::fmt;

/// Result label recorded on a completed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    Win,
    Loss,
    BreakEven,
    /// Any other non-blank label. Trained like a loss.
    Other(String),
}

impl TradeOutcome {
    /// Parses a result label. Blank input has no outcome.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        Some(match normalized.as_str() {
            "win" => TradeOutcome::Win,
            "loss" => TradeOutcome::Loss,
            "be" | "break-even" | "breakeven" | "break_even" => TradeOutcome::BreakEven,
            _ => TradeOutcome::Other(label.trim().to_string()),
        })
    }

    /// Regression target used by the learning step.
    pub fn target(&self) -> f64 {
        match self {
            TradeOutcome::Win => 1.0,
            TradeOutcome::BreakEven => 0.5,
            TradeOutcome::Loss | TradeOutcome::Other(_) => 0.0,
        }
    }

    /// Stable label for logs and metrics.
    pub fn label(&self) -> &str {
        match self {
            TradeOutcome::Win => "win",
            TradeOutcome::Loss => "loss",
            TradeOutcome::BreakEven => "be",
            TradeOutcome::Other(_) => "other",
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Other(raw) => write!(f, "{}", raw),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Model score clamped to `[0, 1]`, shown to the user as "AI confidence".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Clamps a raw model score. NaN maps to 0.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return Self(0.0);
        }
        Self(score.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Rounded percentage, e.g. 72 for 0.7183.
    pub fn percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
