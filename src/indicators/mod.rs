//! Stateless numeric primitives over daily price series.

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;

pub use momentum::momentum;
pub use structure::drawdown_from_recent_high;
pub use trend::{last_sma, slope, sma};
pub use volatility::{daily_range, daily_ranges, volatility_spike};
