use std::fmt::Write as _;

use clap::ValueEnum;
use color_eyre::eyre::{Context, Result};
use compplan_core::domain::{Domain, ParameterSpec};
use compplan_core::format::format_currency;
use compplan_core::{PlanType, SimulationInput, SimulationResult, SweepReport};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Serialize for the JSON and YAML formats; `None` for text
fn to_structured<T: Serialize>(value: &T, format: OutputFormat) -> Option<Result<String>> {
    match format {
        OutputFormat::Text => None,
        OutputFormat::Json => {
            Some(serde_json::to_string_pretty(value).wrap_err("Failed to serialize to JSON"))
        }
        OutputFormat::Yaml => {
            Some(serde_saphyr::to_string(value).wrap_err("Failed to serialize to YAML"))
        }
    }
}

/// `name=value` pairs in registry order
pub fn describe_input(input: &SimulationInput) -> String {
    let values = input.to_vector();
    input
        .plan_type()
        .parameters()
        .iter()
        .zip(values)
        .map(|(spec, value)| format!("{}={value}", spec.name))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_result(
    input: &SimulationInput,
    result: &SimulationResult,
    format: OutputFormat,
) -> Result<String> {
    if let Some(structured) = to_structured(result, format) {
        return structured;
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} plan", result.plan_type().label());
    let _ = writeln!(out, "  {}", describe_input(input));
    let _ = writeln!(out);

    let summary = result.summary();
    let width = summary.iter().map(|row| row.label.len()).max().unwrap_or(0);
    for row in &summary {
        let _ = writeln!(out, "  {:<width$}  {}", row.label, row.value);
    }

    if !result.timeline().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Timeline");
        for (i, step) in result.timeline().iter().enumerate() {
            let _ = writeln!(out, "  {}. {}: {}", i + 1, step.title, step.value);
            let _ = writeln!(out, "     {}", step.hint);
        }
    }
    Ok(out)
}

#[derive(Serialize)]
struct PlanDomains {
    plan: PlanType,
    label: &'static str,
    parameters: &'static [ParameterSpec],
}

pub fn render_domains(plans: &[PlanType], format: OutputFormat) -> Result<String> {
    let domains: Vec<PlanDomains> = plans
        .iter()
        .map(|&plan| PlanDomains {
            plan,
            label: plan.label(),
            parameters: plan.parameters(),
        })
        .collect();
    if let Some(structured) = to_structured(&domains, format) {
        return structured;
    }

    let mut out = String::new();
    for (i, plan) in plans.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{} ({})", plan.label(), plan.slug());
        for spec in plan.parameters() {
            let values = match spec.domain {
                Domain::Discrete { options } => options
                    .iter()
                    .map(|o| o.to_string())
                    .collect::<Vec<_>>()
                    .join(" | "),
                Domain::Continuous(range) => {
                    format!("{}..={} step {}", range.min, range.max, range.step)
                }
            };
            let _ = writeln!(
                out,
                "  {:<26} {values}  (default {})",
                spec.name,
                spec.default_value()
            );
        }
    }
    Ok(out)
}

#[derive(Serialize)]
struct RankedPoint<'a> {
    rank: usize,
    input: &'a SimulationInput,
    headline_payout: f64,
}

pub fn render_sweep(report: &SweepReport, top: usize, format: OutputFormat) -> Result<String> {
    let ranked = report.ranked();
    let points: Vec<RankedPoint<'_>> = ranked
        .iter()
        .take(top)
        .enumerate()
        .map(|(i, point)| RankedPoint {
            rank: i + 1,
            input: &point.input,
            headline_payout: point.headline_payout,
        })
        .collect();
    if let Some(structured) = to_structured(&points, format) {
        return structured;
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} plan: {} grid points",
        report.plan.label(),
        report.len()
    );
    if let (Some(best), Some(worst)) = (report.best(), report.worst()) {
        let _ = writeln!(
            out,
            "  headline payout ranges from {} to {}",
            format_currency(worst.headline_payout),
            format_currency(best.headline_payout)
        );
    }
    let _ = writeln!(out);
    for point in &points {
        let _ = writeln!(
            out,
            "  {:>3}. {:>12}  {}",
            point.rank,
            format_currency(point.headline_payout),
            describe_input(point.input)
        );
    }
    Ok(out)
}
