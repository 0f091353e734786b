//! Generation plan
//!
//! Downline tiers are counted by breakaway boundaries rather than depth.
//! Each paid generation earns a fixed, decreasing share of team volume and a
//! leadership bonus is layered on top, at a rate set by the breakaway
//! personal-volume threshold.

use serde::{Deserialize, Serialize};

use super::{
    PlanCalculator, PlanConstants, PlanOutput, all_finite_non_negative, check_constant,
    non_negative, ratio, to_u32, whole_percent,
};
use crate::domain::{PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::ConfigError;
use crate::format::{
    format_currency, format_percent, format_percent_one_decimal, one_decimal_percent,
};
use crate::model::{PlanType, SummaryRow, TimelineStep};

pub const GENERATIONS_PAID_OPTIONS: &[f64] = &[4.0, 5.0, 6.0];
pub const MONTHLY_TEAM_VOLUME_OPTIONS: &[f64] = &[12_000.0, 22_000.0, 36_000.0];
pub const BREAKAWAY_THRESHOLD_OPTIONS: &[f64] = &[500.0, 800.0, 1_000.0];

static PARAMETERS: [ParameterSpec; PARAMETER_COUNT] = [
    ParameterSpec::discrete(
        "generations_paid",
        "Generations paid",
        GENERATIONS_PAID_OPTIONS,
    ),
    ParameterSpec::discrete(
        "monthly_team_volume",
        "Monthly team volume",
        MONTHLY_TEAM_VOLUME_OPTIONS,
    ),
    ParameterSpec::discrete(
        "breakaway_threshold_pv",
        "Breakaway threshold (PV)",
        BREAKAWAY_THRESHOLD_OPTIONS,
    ),
    ParameterSpec::continuous(
        "average_personal_volume",
        "Average personal volume",
        120.0,
        320.0,
        10.0,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationInput {
    pub generations_paid: u32,
    pub monthly_team_volume: u32,
    pub breakaway_threshold_pv: u32,
    pub average_personal_volume: f64,
}

impl Default for GenerationInput {
    fn default() -> Self {
        GenerationPlan::default_input()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConstants {
    /// Share of team volume paid on each generation, first generation first
    pub generation_percents: Vec<f64>,
    /// Breakaway PV at which the mid and top leadership rates start
    pub leadership_thresholds: [u32; 2],
    pub leadership_rates: [f64; 3],
    pub compliance_base: f64,
    pub compliance_rate_weight: f64,
    pub compliance_pv_divisor: f64,
    pub retention_base: f64,
    pub retention_pv_divisor: f64,
    pub activation_base: f64,
    /// Activation points per thousand of team volume
    pub activation_points_per_thousand: f64,
}

impl Default for GenerationConstants {
    fn default() -> Self {
        Self {
            generation_percents: vec![0.10, 0.07, 0.05, 0.03, 0.02, 0.01],
            leadership_thresholds: [800, 1_000],
            leadership_rates: [0.035, 0.045, 0.055],
            compliance_base: 68.0,
            compliance_rate_weight: 400.0,
            compliance_pv_divisor: 5.0,
            retention_base: 60.0,
            retention_pv_divisor: 2.0,
            activation_base: 55.0,
            activation_points_per_thousand: 2.0,
        }
    }
}

impl PlanConstants for GenerationConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        let plan = PlanType::Generation;
        if self.generation_percents.is_empty() {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "generation_percents",
                reason: "at least one generation must be paid",
            });
        }
        for percent in &self.generation_percents {
            check_constant(plan, "generation_percents", *percent)?;
        }
        if self.generation_percents.iter().sum::<f64>() > 1.0 {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "generation_percents",
                reason: "generations cannot pay out more than the team volume",
            });
        }
        for rate in self.leadership_rates {
            check_constant(plan, "leadership_rates", rate)?;
        }
        if self.leadership_thresholds[0] > self.leadership_thresholds[1] {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "leadership_thresholds",
                reason: "mid threshold must not exceed the top threshold",
            });
        }
        for (name, value) in [
            ("compliance_base", self.compliance_base),
            ("compliance_rate_weight", self.compliance_rate_weight),
            ("compliance_pv_divisor", self.compliance_pv_divisor),
            ("retention_base", self.retention_base),
            ("retention_pv_divisor", self.retention_pv_divisor),
            ("activation_base", self.activation_base),
            ("activation_points_per_thousand", self.activation_points_per_thousand),
        ] {
            check_constant(plan, name, value)?;
        }
        Ok(())
    }
}

impl GenerationConstants {
    /// Percent schedule for the first `generations_paid` generations
    pub fn schedule(&self, generations_paid: u32) -> &[f64] {
        let paid = (generations_paid as usize).min(self.generation_percents.len());
        &self.generation_percents[..paid]
    }

    pub fn leadership_rate(&self, breakaway_threshold_pv: u32) -> f64 {
        if breakaway_threshold_pv >= self.leadership_thresholds[1] {
            self.leadership_rates[2]
        } else if breakaway_threshold_pv >= self.leadership_thresholds[0] {
            self.leadership_rates[1]
        } else {
            self.leadership_rates[0]
        }
    }
}

/// Payout on one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationPayout {
    /// 1-based generation index
    pub generation: u32,
    /// Share of team volume as a percentage with one decimal (e.g. `7.0`)
    pub percent: f64,
    /// Whole currency units
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub generations: Vec<GenerationPayout>,
    pub generation_payout: f64,
    pub leadership_rate: f64,
    pub leadership_bonus: f64,
    pub total_payout: f64,
    /// Fraction (0-1) of team volume paid out
    pub payout_ratio: f64,
    pub compliance_score: u32,
    pub retention_rate: u32,
    pub activation_rate: u32,
    pub timeline: Vec<TimelineStep>,
}

pub struct GenerationPlan;

impl PlanCalculator for GenerationPlan {
    const PLAN: PlanType = PlanType::Generation;

    type Input = GenerationInput;
    type Output = GenerationResult;
    type Constants = GenerationConstants;

    fn parameters() -> &'static [ParameterSpec; PARAMETER_COUNT] {
        &PARAMETERS
    }

    fn to_vector(input: &GenerationInput) -> ParameterVector {
        [
            f64::from(input.generations_paid),
            f64::from(input.monthly_team_volume),
            f64::from(input.breakaway_threshold_pv),
            input.average_personal_volume,
        ]
    }

    fn from_vector(values: &ParameterVector) -> GenerationInput {
        GenerationInput {
            generations_paid: to_u32(values[0]),
            monthly_team_volume: to_u32(values[1]),
            breakaway_threshold_pv: to_u32(values[2]),
            average_personal_volume: values[3],
        }
    }

    fn calculate(input: &GenerationInput, constants: &GenerationConstants) -> GenerationResult {
        let team_volume = f64::from(input.monthly_team_volume);
        let personal_volume = non_negative(input.average_personal_volume);

        let generations: Vec<GenerationPayout> = constants
            .schedule(input.generations_paid)
            .iter()
            .enumerate()
            .map(|(index, &share)| GenerationPayout {
                generation: index as u32 + 1,
                percent: one_decimal_percent(share),
                amount: non_negative(team_volume * share).round(),
            })
            .collect();
        let generation_payout = non_negative(generations.iter().map(|g| g.amount).sum());

        let leadership_rate = constants.leadership_rate(input.breakaway_threshold_pv);
        let leadership_bonus = non_negative(team_volume * leadership_rate).round();
        let total_payout = generation_payout + leadership_bonus;
        let payout_ratio = ratio(total_payout, team_volume).clamp(0.0, 1.0);

        let compliance_score = whole_percent(
            constants.compliance_base
                + leadership_rate * constants.compliance_rate_weight
                + ratio(personal_volume, constants.compliance_pv_divisor),
        );
        let retention_rate = whole_percent(
            constants.retention_base + ratio(personal_volume, constants.retention_pv_divisor),
        );
        let activation_rate = whole_percent(
            constants.activation_base
                + team_volume / 1_000.0 * constants.activation_points_per_thousand,
        );

        let mut timeline: Vec<TimelineStep> = generations
            .iter()
            .map(|g| {
                TimelineStep::new(
                    format!("Generation {}", g.generation),
                    format_currency(g.amount),
                    format!("{:.1}% of team volume", g.percent),
                )
            })
            .collect();
        timeline.push(TimelineStep::new(
            "Leadership bonus",
            format_currency(leadership_bonus),
            format!(
                "{} leadership rate at a {} PV breakaway threshold",
                format_percent_one_decimal(leadership_rate),
                input.breakaway_threshold_pv
            ),
        ));

        tracing::debug!(
            generations = generations.len(),
            generation_payout,
            leadership_bonus,
            "Generation plan simulated"
        );

        GenerationResult {
            generations,
            generation_payout,
            leadership_rate,
            leadership_bonus,
            total_payout,
            payout_ratio,
            compliance_score,
            retention_rate,
            activation_rate,
            timeline,
        }
    }
}

impl PlanOutput for GenerationResult {
    fn headline_payout(&self) -> f64 {
        self.generation_payout
    }

    fn timeline(&self) -> &[TimelineStep] {
        &self.timeline
    }

    fn summary(&self) -> Vec<SummaryRow> {
        vec![
            SummaryRow::new("Generations paid", self.generations.len().to_string()),
            SummaryRow::new("Generation payout", format_currency(self.generation_payout)),
            SummaryRow::new(
                "Leadership rate",
                format_percent_one_decimal(self.leadership_rate),
            ),
            SummaryRow::new("Leadership bonus", format_currency(self.leadership_bonus)),
            SummaryRow::new("Total payout", format_currency(self.total_payout)),
            SummaryRow::new(
                "Payout ratio",
                format_percent_one_decimal(self.payout_ratio),
            ),
            SummaryRow::new(
                "Compliance score",
                format_percent(f64::from(self.compliance_score)),
            ),
            SummaryRow::new(
                "Retention",
                format_percent(f64::from(self.retention_rate)),
            ),
            SummaryRow::new(
                "Activation",
                format_percent(f64::from(self.activation_rate)),
            ),
        ]
    }

    fn is_well_formed(&self) -> bool {
        let amounts: Vec<f64> = self.generations.iter().map(|g| g.amount).collect();
        all_finite_non_negative(&amounts)
            && all_finite_non_negative(&[
                self.generation_payout,
                self.leadership_rate,
                self.leadership_bonus,
                self.total_payout,
                self.payout_ratio,
            ])
            && self.payout_ratio <= 1.0
            && self.compliance_score <= 100
            && self.retention_rate <= 100
            && self.activation_rate <= 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(generations: u32, team_volume: u32, threshold: u32, personal: f64) -> GenerationInput {
        GenerationInput {
            generations_paid: generations,
            monthly_team_volume: team_volume,
            breakaway_threshold_pv: threshold,
            average_personal_volume: personal,
        }
    }

    #[test]
    fn test_schedule_length_follows_generations_paid() {
        let constants = GenerationConstants::default();
        assert_eq!(constants.schedule(4), &[0.10, 0.07, 0.05, 0.03]);
        assert_eq!(constants.schedule(5), &[0.10, 0.07, 0.05, 0.03, 0.02]);
        assert_eq!(constants.schedule(6).len(), 6);
        assert_eq!(constants.schedule(9).len(), 6);
        assert!(constants.schedule(0).is_empty());
    }

    #[test]
    fn test_leadership_rate_tiers() {
        let constants = GenerationConstants::default();
        assert_eq!(constants.leadership_rate(500), 0.035);
        assert_eq!(constants.leadership_rate(800), 0.045);
        assert_eq!(constants.leadership_rate(1_000), 0.055);
    }

    #[test]
    fn test_small_team_low_threshold() {
        let result = GenerationPlan::simulate(&input(4, 12_000, 500, 120.0));

        let amounts: Vec<f64> = result.generations.iter().map(|g| g.amount).collect();
        assert_eq!(amounts, vec![1_200.0, 840.0, 600.0, 360.0]);
        assert_eq!(result.generation_payout, 3_000.0);
        assert_eq!(result.leadership_bonus, 420.0);
        assert_eq!(result.total_payout, 3_420.0);
        assert!((result.payout_ratio - 0.285).abs() < 1e-12);
        // 68 + 14 + 24
        assert_eq!(result.compliance_score, 100);
        assert_eq!(result.retention_rate, 100);
        assert_eq!(result.activation_rate, 79);
    }

    #[test]
    fn test_percent_display_uses_one_decimal() {
        let result = GenerationPlan::simulate(&GenerationInput::default());
        let percents: Vec<f64> = result.generations.iter().map(|g| g.percent).collect();
        assert_eq!(percents, vec![10.0, 7.0, 5.0, 3.0, 2.0]);
        assert_eq!(result.timeline[1].hint, "7.0% of team volume");
    }

    #[test]
    fn test_timeline_has_step_per_generation_plus_bonus() {
        let result = GenerationPlan::simulate(&input(6, 36_000, 1_000, 320.0));
        assert_eq!(result.timeline.len(), 7);
        assert_eq!(result.timeline[6].title, "Leadership bonus");
        assert_eq!(result.timeline[6].value, "$1,980");
    }

    #[test]
    fn test_scores_stay_below_cap_with_weak_inputs() {
        let constants = GenerationConstants {
            compliance_base: 10.0,
            retention_base: 0.0,
            activation_base: 0.0,
            ..Default::default()
        };
        let result = GenerationPlan::simulate_with(&input(4, 12_000, 500, 120.0), &constants);
        // 10 + 14 + 24
        assert_eq!(result.compliance_score, 48);
        assert_eq!(result.retention_rate, 60);
        assert_eq!(result.activation_rate, 24);
    }

    #[test]
    fn test_constants_validation() {
        assert!(GenerationConstants::default().validate().is_ok());

        let empty = GenerationConstants {
            generation_percents: vec![],
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        let overpaying = GenerationConstants {
            generation_percents: vec![0.6, 0.5],
            ..Default::default()
        };
        assert!(overpaying.validate().is_err());
    }
}
