//! Journal-side record shapes consumed by the predictor.

pub mod draft;
pub mod entry;
pub mod field_source;
pub mod outcome;

pub use draft::{FormField, TradeDraft};
pub use entry::JournalEntry;
pub use field_source::{FieldValue, TradeField, TradeFieldSource, TradeSources};
pub use outcome::{Confidence, TradeOutcome};
