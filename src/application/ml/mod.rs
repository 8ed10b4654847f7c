pub mod bootstrap;
pub mod online_predictor;
pub mod predictor;

pub use online_predictor::{LEARNING_RATE, OnlinePredictor};
pub use predictor::{LearnReport, OutcomeModel};
