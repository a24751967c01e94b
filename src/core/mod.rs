//! Worker runtime: run guard, cron scheduler and HTTP surface

pub mod bootstrap;
pub mod http;
pub mod runtime;
pub mod scheduler;

pub use http::*;
pub use runtime::*;
pub use scheduler::*;
