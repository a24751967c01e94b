//! Market structure indicators: drawdown

pub mod drawdown;

pub use drawdown::*;
