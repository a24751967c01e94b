//! Stockshark: daily stock-market risk digest.
//!
//! The signal engine in [`signals`] turns a daily price series into an
//! OK / WARN / CRITICAL verdict; [`jobs`] runs it across the configured
//! watchlists and [`render`] plus [`services::email`] deliver the result.

pub mod config;
pub mod core;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod render;
pub mod services;
pub mod signals;
