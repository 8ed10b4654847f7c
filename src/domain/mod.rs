// Journal record shapes (draft form, persisted entry)
pub mod journal;

// Feature layout and encoding
pub mod ml;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
