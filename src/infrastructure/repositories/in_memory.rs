//! In-Memory Weight Repository
//!
//! Thread-safe, process-local implementation of `WeightRepository`.
//!
//! - **Testing**: no filesystem access, and saves can be made to fail on demand
//! - **Ephemeral deployments**: weights are lost on restart, so every new
//!   process starts from the bootstrap prior
//!
//! For durable storage use `JsonFileWeightRepository`.

use crate::domain::errors::PersistenceError;
use crate::domain::ml::WeightVector;
use crate::domain::repositories::WeightRepository;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct InMemoryWeightRepository {
    slot: RwLock<Option<WeightVector>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryWeightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that already holds `weights`.
    pub fn with_weights(weights: WeightVector) -> Self {
        Self {
            slot: RwLock::new(Some(weights)),
            ..Default::default()
        }
    }

    /// Makes subsequent saves fail with `PersistenceError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Currently stored weights.
    pub fn stored(&self) -> Option<WeightVector> {
        *self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WeightRepository for InMemoryWeightRepository {
    fn load(&self) -> Result<Option<WeightVector>, PersistenceError> {
        Ok(self.stored())
    }

    fn save(&self, weights: &WeightVector) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable {
                reason: "simulated save failure".to_string(),
            });
        }
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(*weights);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
