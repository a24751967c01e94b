//! Daily digest workflow

pub mod context;
pub mod handlers;
pub mod types;
pub mod workflow;

pub use context::DigestContext;
pub use types::{DigestReport, DigestSections, MarketPulseRow, ResearchEntry, RiskSummary, SignalRow};
pub use workflow::{DigestError, DigestWorkflow};
