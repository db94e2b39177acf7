//! CLI library components for the SMS pipeline.

pub mod config;
pub mod logging;
pub mod summary;
