//! Scenario and constants files
//!
//! A scenario names a plan and overrides any of its parameters; parameters
//! it leaves out keep their domain defaults:
//!
//! ```yaml
//! name: Wider launch
//! plan: matrix
//! parameters:
//!   width: 4
//!   monthly_entrants: 240
//! ```
//!
//! A constants file is a partial `EngineConfig`; plans and fields it leaves
//! out keep their stock values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result, eyre};
use compplan_core::{EngineConfig, ParameterError, PlanType, SimulationInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    pub plan: PlanType,
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}

impl ScenarioFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Apply the overrides to the plan's default input
    pub fn to_input(&self) -> Result<SimulationInput, ParameterError> {
        self.parameters
            .iter()
            .try_fold(self.plan.default_input(), |input, (name, &value)| {
                input.with_parameter(name, value)
            })
    }
}

pub fn load_scenario(path: &Path) -> Result<(ScenarioFile, SimulationInput)> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario = ScenarioFile::from_yaml(&content)
        .wrap_err_with(|| format!("Failed to parse scenario {}", path.display()))?;
    let input = scenario
        .to_input()
        .wrap_err_with(|| format!("Invalid parameter in scenario {}", path.display()))?;

    tracing::debug!(
        plan = %scenario.plan,
        overrides = scenario.parameters.len(),
        "Scenario loaded"
    );
    Ok((scenario, input))
}

/// Load plan constants, falling back to the stock values when no file is given
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read constants {}", path.display()))?;
    let config: EngineConfig = serde_saphyr::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse constants {}", path.display()))?;
    config
        .validate()
        .wrap_err_with(|| format!("Invalid constants in {}", path.display()))?;

    tracing::info!("Loaded plan constants from {}", path.display());
    Ok(config)
}

/// Parse a `name=value` override as given to `--set`
pub fn parse_assignment(raw: &str) -> Result<(String, f64)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| eyre!("expected name=value, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(eyre!("missing parameter name in `{raw}`"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .wrap_err_with(|| format!("`{}` is not a number", value.trim()))?;
    Ok((name.to_string(), value))
}

/// Apply `--set` overrides in order
pub fn apply_overrides(
    input: SimulationInput,
    overrides: &[(String, f64)],
) -> Result<SimulationInput, ParameterError> {
    overrides
        .iter()
        .try_fold(input, |input, (name, value)| input.with_parameter(name, *value))
}
