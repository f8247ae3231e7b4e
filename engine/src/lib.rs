// Engine library root
pub mod compute;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod services;
pub mod summary;

pub use compute::{compute_indicators, IndicatorEngine};
pub use error::EngineError;
