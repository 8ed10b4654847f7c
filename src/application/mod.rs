// Journal workflows that consume the model
pub mod journal;

// Online outcome model
pub mod ml;
