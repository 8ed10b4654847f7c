pub mod feature_encoder;
pub mod feature_registry;

pub use feature_encoder::{FeatureEncoder, FixedHourSource, HourSource, SystemHourSource};
pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, WeightVector};
