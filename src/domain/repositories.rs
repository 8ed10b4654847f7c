//! Repository Pattern Abstractions
//!
//! The predictor's whole durable state is one [`WeightVector`]. Storage is
//! hidden behind [`WeightRepository`] so the predictor can run against a
//! JSON file in production and an in-memory slot in tests.

use crate::domain::errors::PersistenceError;
use crate::domain::ml::WeightVector;

pub trait WeightRepository: Send + Sync {
    /// Returns `Ok(None)` when no weights have been stored yet.
    fn load(&self) -> Result<Option<WeightVector>, PersistenceError>;

    /// Replaces the stored weights. On error the previous state must remain.
    fn save(&self, weights: &WeightVector) -> Result<(), PersistenceError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}
