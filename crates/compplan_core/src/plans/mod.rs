//! Plan calculators
//!
//! One unit type per plan topology implements [`PlanCalculator`]. The
//! calculators never call each other; they share only the formatting leaf,
//! the parameter registry and the guarded arithmetic helpers below.
//!
//! Three entry points are layered on top of the raw formulas:
//!
//! - `calculate` runs the formulas on any input, guarding every division
//! - `try_simulate_with` validates the plan constants and the parameter
//!   domain first and reports the offending value
//! - `simulate_with` / `simulate` never fail: an input outside its domain or
//!   unusable constants yield the plan's neutral (all-zero) result

use std::fmt::Debug;

use crate::domain::{self, PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::{ConfigError, ParameterError, SimulationError};
use crate::model::{PlanType, SummaryRow, TimelineStep};

pub mod binary;
pub mod board;
pub mod generation;
pub mod matrix;
pub mod stair_step;

pub use binary::{BinaryConstants, BinaryInput, BinaryPlan, BinaryResult};
pub use board::{BoardConstants, BoardInput, BoardPlan, BoardResult};
pub use generation::{
    GenerationConstants, GenerationInput, GenerationPayout, GenerationPlan, GenerationResult,
};
pub use matrix::{
    LevelFill, MatrixConstants, MatrixInput, MatrixPlan, MatrixResult, OversightLevel,
};
pub use stair_step::{StairStepConstants, StairStepInput, StairStepPlan, StairStepResult};

/// Read access shared by every plan result
pub trait PlanOutput {
    /// The figure sweeps rank by (gross payout, payout pool, ...)
    fn headline_payout(&self) -> f64;

    fn timeline(&self) -> &[TimelineStep];

    /// Labelled, display-ready figures in presentation order
    fn summary(&self) -> Vec<SummaryRow>;

    /// Every figure finite, non-negative and inside its percentage range
    fn is_well_formed(&self) -> bool;
}

/// Business constants of one plan
pub trait PlanConstants: Default {
    /// Reject constants that would make the formulas produce negative or
    /// non-finite figures
    fn validate(&self) -> Result<(), ConfigError>;
}

pub trait PlanCalculator {
    const PLAN: PlanType;

    type Input: Copy + PartialEq + Debug;
    type Output: PlanOutput + Default + Clone + Debug;
    type Constants: PlanConstants;

    /// Parameter registry in vector order
    fn parameters() -> &'static [ParameterSpec; PARAMETER_COUNT];

    fn to_vector(input: &Self::Input) -> ParameterVector;

    fn from_vector(values: &ParameterVector) -> Self::Input;

    /// Run the plan formulas without checking the parameter domain
    fn calculate(input: &Self::Input, constants: &Self::Constants) -> Self::Output;

    fn validate(input: &Self::Input) -> Result<(), ParameterError> {
        domain::validate_vector(Self::parameters(), &Self::to_vector(input))
    }

    /// Check the constants and the input, then calculate
    fn try_simulate_with(
        input: &Self::Input,
        constants: &Self::Constants,
    ) -> Result<Self::Output, SimulationError> {
        constants.validate()?;
        Self::validate(input)?;
        Ok(Self::calculate(input, constants))
    }

    fn simulate_with(input: &Self::Input, constants: &Self::Constants) -> Self::Output {
        match Self::try_simulate_with(input, constants) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(plan = %Self::PLAN, error = %err, "Returning neutral result");
                Self::Output::default()
            }
        }
    }

    fn simulate(input: &Self::Input) -> Self::Output {
        Self::simulate_with(input, &Self::Constants::default())
    }

    fn default_input() -> Self::Input {
        Self::from_vector(&domain::default_vector(Self::parameters()))
    }

    /// Every domain-valid input of the plan
    fn grid() -> Vec<Self::Input> {
        domain::grid(Self::parameters())
            .iter()
            .map(Self::from_vector)
            .collect()
    }
}

// ============================================================================
// Guarded arithmetic
// ============================================================================

/// `numerator / denominator`, or 0 when the quotient would not be finite
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// Clamp NaN, infinities and negatives to 0
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round a non-negative quantity to a whole count
pub(crate) fn to_count(value: f64) -> u64 {
    non_negative(value).round() as u64
}

/// Round to a whole percentage clamped to 0-100
pub(crate) fn whole_percent(value: f64) -> u32 {
    non_negative(value).round().min(100.0) as u32
}

/// Saturating conversion of a parameter value to an integer field
pub(crate) fn to_u32(value: f64) -> u32 {
    non_negative(value).round().min(f64::from(u32::MAX)) as u32
}

pub(crate) fn all_finite_non_negative(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite() && *v >= 0.0)
}

/// Reject a plan constant that is non-finite or negative
pub(crate) fn check_constant(
    plan: PlanType,
    name: &'static str,
    value: f64,
) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { plan, name, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { plan, name, value });
    }
    Ok(())
}
