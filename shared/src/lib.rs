// Data model shared between the indicator engine and whatever consumes its output.
pub mod models;
pub mod utils;
