//! Configuration module for the journal predictor.
//!
//! Structured configuration loaded from environment variables (after
//! `dotenvy` has merged any `.env` file), organized by concern.

mod observability_config;
mod predictor_config;

pub use observability_config::ObservabilityEnvConfig;
pub use predictor_config::PredictorEnvConfig;

use anyhow::Result;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub predictor: PredictorEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            predictor: PredictorEnvConfig::from_lookup(&lookup)?,
            observability: ObservabilityEnvConfig::from_lookup(&lookup),
        })
    }
}
