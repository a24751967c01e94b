//! Momentum indicators: rate of change

pub mod roc;

pub use roc::*;
