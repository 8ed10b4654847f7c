//! JSON file persistence for the predictor weights.
//!
//! The file holds a bare JSON array of six floats. Writes go to a temp file
//! that is renamed over the target, so a failed save never leaves a partial
//! file behind.

use crate::domain::errors::PersistenceError;
use crate::domain::ml::{FEATURE_COUNT, WeightVector};
use crate::domain::repositories::WeightRepository;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const WEIGHTS_FILE_NAME: &str = "ai_weights.json";
const CONFIG_DIR_NAME: &str = ".journal_predictor";

pub struct JsonFileWeightRepository {
    file_path: PathBuf,
}

impl JsonFileWeightRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Repository at `~/.journal_predictor/ai_weights.json`.
    pub fn in_home_dir() -> Result<Self, PersistenceError> {
        Ok(Self::new(default_weights_path()?))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            location: self.location(),
            source,
        }
    }
}

/// Default weights location under the user's home directory.
pub fn default_weights_path() -> Result<PathBuf, PersistenceError> {
    let home = std::env::var("HOME").map_err(|_| PersistenceError::Unavailable {
        reason: "Could not find HOME directory".to_string(),
    })?;
    Ok(PathBuf::from(home)
        .join(CONFIG_DIR_NAME)
        .join(WEIGHTS_FILE_NAME))
}

impl WeightRepository for JsonFileWeightRepository {
    fn load(&self) -> Result<Option<WeightVector>, PersistenceError> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        // Parse loosely first so a wrong length gets a precise error.
        let values: Vec<f64> =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Serialization {
                location: self.location(),
                source,
            })?;
        let values: [f64; FEATURE_COUNT] =
            values
                .try_into()
                .map_err(|v: Vec<f64>| PersistenceError::InvalidShape {
                    location: self.location(),
                    found: v.len(),
                    expected: FEATURE_COUNT,
                })?;

        debug!("Loaded predictor weights from {:?}", self.file_path);
        Ok(Some(WeightVector::new(values)))
    }

    fn save(&self, weights: &WeightVector) -> Result<(), PersistenceError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(weights).map_err(|source| {
            PersistenceError::Serialization {
                location: self.location(),
                source,
            }
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&temp_path, &self.file_path) {
            fs::remove_file(&temp_path).ok();
            return Err(self.io_error(e));
        }

        info!("Saved predictor weights to {:?}", self.file_path);
        Ok(())
    }

    fn location(&self) -> String {
        self.file_path.display().to_string()
    }
}
