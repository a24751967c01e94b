//! Shared data models spanning the engine layers.

pub mod bar;
pub mod quote;
pub mod signal;

pub use bar::{PriceBar, PriceSeries, MIN_HISTORY_BARS};
pub use quote::Quote;
pub use signal::{RiskLevel, SignalResult};
