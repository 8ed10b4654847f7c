use thiserror::Error;

/// Errors raised by a weight repository.
///
/// None of these are fatal for the predictor: callers log them and keep
/// running on the in-memory weights.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O failure on {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed weight data in {location}: {source}")]
    Serialization {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Weight vector in {location} has {found} values, expected {expected}")]
    InvalidShape {
        location: String,
        found: usize,
        expected: usize,
    },

    #[error("Weight store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl PersistenceError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PersistenceError::Io { .. } => "io",
            PersistenceError::Serialization { .. } => "serialization",
            PersistenceError::InvalidShape { .. } => "invalid_shape",
            PersistenceError::Unavailable { .. } => "unavailable",
        }
    }
}
