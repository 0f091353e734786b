//! Compensation plan simulation library
//!
//! This crate provides deterministic "what-if" calculators for five
//! compensation plan topologies:
//! - Binary / spillover (weak-leg pair matching, flush risk)
//! - Matrix (fixed width and depth, breadth-first fill)
//! - Board / cyclic (board cycling, re-entry and queueing)
//! - Stair-step / breakaway (override tiers on group volume)
//! - Generation (per-generation percentages plus leadership bonus)
//!
//! Each calculator maps a small parameter vector, drawn from a fixed
//! parameter domain, to a result with payouts, volumes, health scores and a
//! narrative timeline. Calls are pure: no state survives between them.
//!
//! ```
//! use compplan_core::{PlanType, simulate};
//!
//! # fn main() -> Result<(), compplan_core::ParameterError> {
//! let input = PlanType::Matrix
//!     .default_input()
//!     .with_parameter("depth", 10.0)?;
//! let result = simulate(&input);
//! assert!(result.is_well_formed());
//! for row in result.summary() {
//!     println!("{}: {}", row.label, row.value);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod plans;
pub mod simulation;
pub mod sweep;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cache::SimulationCache;
pub use config::EngineConfig;
pub use error::{ConfigError, ParameterError, SimulationError};
pub use model::{PlanType, SummaryRow, TimelineStep};
pub use plans::{PlanCalculator, PlanConstants, PlanOutput};
pub use simulation::{SimulationInput, SimulationResult, simulate, simulate_with, try_simulate};
pub use sweep::{SweepReport, sweep};
