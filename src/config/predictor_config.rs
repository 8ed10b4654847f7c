//! Predictor storage configuration parsing from environment variables.
//!
//! Only the storage location is configurable. Learning rate, default weights
//! and the bootstrap sweep are fixed properties of the model.

use crate::infrastructure::weight_persistence::default_weights_path;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Predictor environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorEnvConfig {
    pub weights_path: PathBuf,
}

impl PredictorEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let weights_path = match lookup("PREDICTOR_WEIGHTS_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path.trim()),
            None => default_weights_path()
                .context("PREDICTOR_WEIGHTS_PATH not set and no default location available")?,
        };

        Ok(Self { weights_path })
    }
}
