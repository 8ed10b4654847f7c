pub mod observability;
pub mod repositories;
pub mod weight_persistence;

pub use repositories::InMemoryWeightRepository;
pub use weight_persistence::JsonFileWeightRepository;
