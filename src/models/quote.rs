use serde::{Deserialize, Serialize};

/// Live quote: current price and previous close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "c", default)]
    pub current: Option<f64>,
    #[serde(rename = "pc", default)]
    pub previous_close: Option<f64>,
}

impl Quote {
    pub fn new(current: f64, previous_close: f64) -> Self {
        Self {
            current: Some(current),
            previous_close: Some(previous_close),
        }
    }

    /// One-day fractional change, 0.0 when either side is missing or the
    /// previous close is not positive.
    pub fn pct_change(&self) -> f64 {
        match (self.current, self.previous_close) {
            (Some(c), Some(pc)) if pc > 0.0 => c / pc - 1.0,
            _ => 0.0,
        }
    }
}
