//! Observability configuration parsing from environment variables.
//!
//! This module handles loading metrics and log-format settings.

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    pub metrics_enabled: bool,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            json_logs: false,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            metrics_enabled: lookup("PREDICTOR_METRICS_ENABLED")
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(defaults.metrics_enabled),
            json_logs: lookup("PREDICTOR_LOG_JSON")
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(defaults.json_logs),
        }
    }
}
