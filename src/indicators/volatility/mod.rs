//! Volatility indicators: daily range, range spikes

pub mod range;

pub use range::*;
