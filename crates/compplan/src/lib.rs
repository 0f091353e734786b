//! Command-line front end for the compensation plan simulator
//!
//! Wraps `compplan_core` with YAML scenario and constants loading, text /
//! JSON / YAML rendering and logging set-up.

pub mod commands;
pub mod logging;
pub mod render;
pub mod scenario;

pub use logging::init_logging;
pub use render::OutputFormat;
