//! Ambient services for the analyzer binary: configuration and logging.

pub mod config;
pub mod logging;
