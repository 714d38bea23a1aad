pub mod generator;
pub mod healing;
pub mod strategy_model;

pub use generator::{generate, generate_for, score_raw_selector};
pub use strategy_model::{GeneratedLocators, LocatorStrategy, StrategyType};
