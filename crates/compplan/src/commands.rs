//! Subcommand bodies
//!
//! Each command returns the text to print so it can be tested without a
//! terminal. Parameters are always checked strictly here: an out-of-domain
//! value is an error, never a silently zeroed result.

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use compplan_core::{PlanType, try_simulate};

use crate::render::{self, OutputFormat};
use crate::scenario;

pub fn domains(plan: Option<PlanType>, format: OutputFormat) -> Result<String> {
    match plan {
        Some(plan) => render::render_domains(&[plan], format),
        None => render::render_domains(&PlanType::ALL, format),
    }
}

pub fn simulate(
    plan: PlanType,
    overrides: &[(String, f64)],
    constants: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let config = scenario::load_config(constants)?;
    let input = scenario::apply_overrides(plan.default_input(), overrides)
        .wrap_err_with(|| format!("Invalid override for the {plan} plan"))?;

    let result = try_simulate(&input, &config)?;
    tracing::info!(
        plan = %plan,
        headline_payout = result.headline_payout(),
        "Simulation complete"
    );
    render::render_result(&input, &result, format)
}

pub fn run(scenario_path: &Path, constants: Option<&Path>, format: OutputFormat) -> Result<String> {
    let config = scenario::load_config(constants)?;
    let (scenario, input) = scenario::load_scenario(scenario_path)?;

    let result = try_simulate(&input, &config)?;
    tracing::info!(
        plan = %scenario.plan,
        name = scenario.name.as_deref().unwrap_or("unnamed"),
        headline_payout = result.headline_payout(),
        "Scenario complete"
    );

    let rendered = render::render_result(&input, &result, format)?;
    match (&scenario.name, format) {
        (Some(name), OutputFormat::Text) => Ok(format!("{name}\n\n{rendered}")),
        _ => Ok(rendered),
    }
}

pub fn sweep(
    plan: PlanType,
    top: usize,
    constants: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let config = scenario::load_config(constants)?;
    let report = compplan_core::sweep(plan, &config);

    if !report.all_well_formed() {
        tracing::warn!(plan = %plan, "Sweep produced figures outside their expected ranges");
    }
    tracing::info!(plan = %plan, points = report.len(), "Sweep complete");
    render::render_sweep(&report, top, format)
}
