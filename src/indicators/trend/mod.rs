//! Trend indicators: SMA, slope

pub mod sma;
pub mod slope;

pub use sma::*;
pub use slope::*;
