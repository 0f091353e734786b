//! Plan-agnostic entry points
//!
//! `SimulationInput` and `SimulationResult` close over the five plans so a
//! caller holding only a `PlanType` can build, validate and simulate inputs
//! without naming the concrete calculator.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{self, PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::{self, ParameterError};
use crate::model::{PlanType, SummaryRow, TimelineStep};
use crate::plans::{
    BinaryInput, BinaryPlan, BinaryResult, BoardInput, BoardPlan, BoardResult, GenerationInput,
    GenerationPlan, GenerationResult, MatrixInput, MatrixPlan, MatrixResult, PlanCalculator,
    PlanOutput, StairStepInput, StairStepPlan, StairStepResult,
};

/// Selected parameter values for one plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "kebab-case")]
pub enum SimulationInput {
    Binary(BinaryInput),
    Matrix(MatrixInput),
    Board(BoardInput),
    StairStep(StairStepInput),
    Generation(GenerationInput),
}

/// Derived metrics and timeline for one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "kebab-case")]
pub enum SimulationResult {
    Binary(BinaryResult),
    Matrix(MatrixResult),
    Board(BoardResult),
    StairStep(StairStepResult),
    Generation(GenerationResult),
}

impl PlanType {
    /// Parameter registry of the plan, in vector order
    pub fn parameters(self) -> &'static [ParameterSpec; PARAMETER_COUNT] {
        match self {
            PlanType::Binary => BinaryPlan::parameters(),
            PlanType::Matrix => MatrixPlan::parameters(),
            PlanType::Board => BoardPlan::parameters(),
            PlanType::StairStep => StairStepPlan::parameters(),
            PlanType::Generation => GenerationPlan::parameters(),
        }
    }

    /// The plan's input with every parameter at its default selection
    pub fn default_input(self) -> SimulationInput {
        SimulationInput::from_vector(self, &domain::default_vector(self.parameters()))
    }
}

impl SimulationInput {
    pub fn plan_type(&self) -> PlanType {
        match self {
            SimulationInput::Binary(_) => PlanType::Binary,
            SimulationInput::Matrix(_) => PlanType::Matrix,
            SimulationInput::Board(_) => PlanType::Board,
            SimulationInput::StairStep(_) => PlanType::StairStep,
            SimulationInput::Generation(_) => PlanType::Generation,
        }
    }

    pub fn to_vector(&self) -> ParameterVector {
        match self {
            SimulationInput::Binary(input) => BinaryPlan::to_vector(input),
            SimulationInput::Matrix(input) => MatrixPlan::to_vector(input),
            SimulationInput::Board(input) => BoardPlan::to_vector(input),
            SimulationInput::StairStep(input) => StairStepPlan::to_vector(input),
            SimulationInput::Generation(input) => GenerationPlan::to_vector(input),
        }
    }

    pub fn from_vector(plan: PlanType, values: &ParameterVector) -> Self {
        match plan {
            PlanType::Binary => SimulationInput::Binary(BinaryPlan::from_vector(values)),
            PlanType::Matrix => SimulationInput::Matrix(MatrixPlan::from_vector(values)),
            PlanType::Board => SimulationInput::Board(BoardPlan::from_vector(values)),
            PlanType::StairStep => SimulationInput::StairStep(StairStepPlan::from_vector(values)),
            PlanType::Generation => {
                SimulationInput::Generation(GenerationPlan::from_vector(values))
            }
        }
    }

    /// Replace one named parameter
    ///
    /// The value is checked against its domain before it is stored, since
    /// integer fields would otherwise round a fractional value silently.
    pub fn with_parameter(&self, name: &str, value: f64) -> Result<Self, ParameterError> {
        let plan = self.plan_type();
        let specs = plan.parameters();
        let index = domain::position(specs, name).ok_or_else(|| ParameterError::Unknown {
            plan,
            name: name.to_string(),
        })?;
        specs[index].check(value)?;
        let mut values = self.to_vector();
        values[index] = value;
        Ok(Self::from_vector(plan, &values))
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        match self {
            SimulationInput::Binary(input) => BinaryPlan::validate(input),
            SimulationInput::Matrix(input) => MatrixPlan::validate(input),
            SimulationInput::Board(input) => BoardPlan::validate(input),
            SimulationInput::StairStep(input) => StairStepPlan::validate(input),
            SimulationInput::Generation(input) => GenerationPlan::validate(input),
        }
    }

    /// Every domain-valid input of a plan
    pub fn grid(plan: PlanType) -> Vec<Self> {
        domain::grid(plan.parameters())
            .iter()
            .map(|values| Self::from_vector(plan, values))
            .collect()
    }
}

impl SimulationResult {
    pub fn plan_type(&self) -> PlanType {
        match self {
            SimulationResult::Binary(_) => PlanType::Binary,
            SimulationResult::Matrix(_) => PlanType::Matrix,
            SimulationResult::Board(_) => PlanType::Board,
            SimulationResult::StairStep(_) => PlanType::StairStep,
            SimulationResult::Generation(_) => PlanType::Generation,
        }
    }

    fn output(&self) -> &dyn PlanOutput {
        match self {
            SimulationResult::Binary(result) => result,
            SimulationResult::Matrix(result) => result,
            SimulationResult::Board(result) => result,
            SimulationResult::StairStep(result) => result,
            SimulationResult::Generation(result) => result,
        }
    }

    pub fn headline_payout(&self) -> f64 {
        self.output().headline_payout()
    }

    pub fn timeline(&self) -> &[TimelineStep] {
        self.output().timeline()
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        self.output().summary()
    }

    pub fn is_well_formed(&self) -> bool {
        self.output().is_well_formed()
    }
}

/// Simulate with the stock plan constants
pub fn simulate(input: &SimulationInput) -> SimulationResult {
    simulate_with(input, &EngineConfig::default())
}

/// Simulate with configured plan constants; inputs outside their domain and
/// unusable constants produce the plan's neutral result
pub fn simulate_with(input: &SimulationInput, config: &EngineConfig) -> SimulationResult {
    match input {
        SimulationInput::Binary(input) => {
            SimulationResult::Binary(BinaryPlan::simulate_with(input, &config.binary))
        }
        SimulationInput::Matrix(input) => {
            SimulationResult::Matrix(MatrixPlan::simulate_with(input, &config.matrix))
        }
        SimulationInput::Board(input) => {
            SimulationResult::Board(BoardPlan::simulate_with(input, &config.board))
        }
        SimulationInput::StairStep(input) => {
            SimulationResult::StairStep(StairStepPlan::simulate_with(input, &config.stair_step))
        }
        SimulationInput::Generation(input) => SimulationResult::Generation(
            GenerationPlan::simulate_with(input, &config.generation),
        ),
    }
}

/// Simulate, rejecting inputs outside their domain and unusable plan constants
pub fn try_simulate(
    input: &SimulationInput,
    config: &EngineConfig,
) -> error::Result<SimulationResult> {
    let result = match input {
        SimulationInput::Binary(input) => {
            SimulationResult::Binary(BinaryPlan::try_simulate_with(input, &config.binary)?)
        }
        SimulationInput::Matrix(input) => {
            SimulationResult::Matrix(MatrixPlan::try_simulate_with(input, &config.matrix)?)
        }
        SimulationInput::Board(input) => {
            SimulationResult::Board(BoardPlan::try_simulate_with(input, &config.board)?)
        }
        SimulationInput::StairStep(input) => SimulationResult::StairStep(
            StairStepPlan::try_simulate_with(input, &config.stair_step)?,
        ),
        SimulationInput::Generation(input) => SimulationResult::Generation(
            GenerationPlan::try_simulate_with(input, &config.generation)?,
        ),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, SimulationError};

    #[test]
    fn test_default_inputs_validate() {
        for plan in PlanType::ALL {
            let input = plan.default_input();
            assert_eq!(input.plan_type(), plan);
            assert!(input.validate().is_ok(), "{plan} default is invalid");
        }
    }

    #[test]
    fn test_dispatch_preserves_plan_type() {
        for plan in PlanType::ALL {
            let result = simulate(&plan.default_input());
            assert_eq!(result.plan_type(), plan);
            assert!(!result.timeline().is_empty());
            assert!(!result.summary().is_empty());
        }
    }

    #[test]
    fn test_with_parameter() {
        let input = PlanType::Matrix.default_input();
        let deeper = input.with_parameter("depth", 10.0).unwrap();
        match deeper {
            SimulationInput::Matrix(m) => assert_eq!(m.depth, 10),
            other => panic!("Expected matrix input, got {other:?}"),
        }

        let err = input.with_parameter("legs", 3.0).unwrap_err();
        assert!(matches!(err, ParameterError::Unknown { plan: PlanType::Matrix, .. }));

        // Fractional values are not rounded onto an integer option
        let err = input.with_parameter("width", 3.4).unwrap_err();
        assert!(matches!(err, ParameterError::NotAnOption { name: "width", .. }));
    }

    #[test]
    fn test_try_simulate_rejects_out_of_domain() {
        let input = SimulationInput::Board(BoardInput {
            board_capacity: 7,
            ..BoardInput::default()
        });
        let err = try_simulate(&input, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter(ParameterError::NotAnOption {
                name: "board_capacity",
                ..
            })
        ));

        // The lenient path neutralises the same input instead of failing
        let neutral = simulate(&input);
        assert_eq!(neutral, SimulationResult::Board(BoardResult::default()));
    }

    #[test]
    fn test_try_simulate_rejects_invalid_constants() {
        let mut config = EngineConfig::default();
        config.binary.weak_share_cap = 1.5;
        let err = try_simulate(&PlanType::Binary.default_input(), &config).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Config(ConfigError::Inconsistent {
                name: "weak_share_cap",
                ..
            })
        ));
    }

    #[test]
    fn test_input_deserializes_with_plan_tag_and_defaults() {
        let input: SimulationInput =
            serde_json::from_str(r#"{ "plan": "matrix", "width": 4 }"#).unwrap();
        let SimulationInput::Matrix(matrix) = input else {
            panic!("Expected matrix input");
        };
        assert_eq!(matrix.width, 4);
        assert_eq!(matrix.depth, 8);
        assert_eq!(matrix.monthly_entrants, 150);
    }

    #[test]
    fn test_grid_sizes() {
        // Binary: 3 x 3 x 3 x 15 order values
        assert_eq!(SimulationInput::grid(PlanType::Binary).len(), 405);
        assert_eq!(SimulationInput::grid(PlanType::Matrix).len(), 81);
        assert_eq!(SimulationInput::grid(PlanType::Board).len(), 459);
        assert_eq!(SimulationInput::grid(PlanType::StairStep).len(), 81);
        assert_eq!(SimulationInput::grid(PlanType::Generation).len(), 567);
    }
}
