//! Stair-step / breakaway plan
//!
//! Frontline legs that reach manager rank break away into semi-independent
//! groups. The distributor keeps an override on the whole group volume, at a
//! rate that rises with the number of legs required to break away.

use serde::{Deserialize, Serialize};

use super::{
    PlanCalculator, PlanConstants, PlanOutput, all_finite_non_negative, check_constant,
    non_negative, ratio, to_count, to_u32,
};
use crate::domain::{PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::ConfigError;
use crate::format::{format_count, format_currency, format_percent};
use crate::model::{PlanType, SummaryRow, TimelineStep};

pub const BREAKAWAY_REQUIREMENT_OPTIONS: &[f64] = &[3.0, 4.0, 5.0];
pub const FRONTLINE_LEG_OPTIONS: &[f64] = &[6.0, 9.0, 12.0];
pub const AVERAGE_LEG_VOLUME_OPTIONS: &[f64] = &[12_000.0, 18_000.0, 24_000.0];
pub const NEW_ENROLMENT_OPTIONS: &[f64] = &[18.0, 32.0, 48.0];

static PARAMETERS: [ParameterSpec; PARAMETER_COUNT] = [
    ParameterSpec::discrete(
        "breakaway_requirement",
        "Manager legs required to break away",
        BREAKAWAY_REQUIREMENT_OPTIONS,
    ),
    ParameterSpec::discrete(
        "frontline_leg_count",
        "Frontline legs",
        FRONTLINE_LEG_OPTIONS,
    ),
    ParameterSpec::discrete(
        "average_leg_volume",
        "Average leg volume",
        AVERAGE_LEG_VOLUME_OPTIONS,
    ),
    ParameterSpec::discrete(
        "new_enrolments_per_month",
        "New enrolments per month",
        NEW_ENROLMENT_OPTIONS,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StairStepInput {
    pub breakaway_requirement: u32,
    pub frontline_leg_count: u32,
    pub average_leg_volume: u32,
    pub new_enrolments_per_month: u32,
}

impl Default for StairStepInput {
    fn default() -> Self {
        StairStepPlan::default_input()
    }
}

/// Rate tiers are indexed entry / mid / top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StairStepConstants {
    /// Breakaway requirements at which the mid and top tiers start
    pub tier_thresholds: [u32; 2],
    pub override_rates: [f64; 3],
    pub cycle_days: [u32; 3],
    /// Monthly enrolments that grow one additional emerging leg
    pub enrolments_per_emerging_leg: f64,
    /// Share of a foundation leg's volume that counts toward group volume
    pub developing_volume_factor: f64,
    pub onboarding_volume_per_enrolment: f64,
    pub leadership_pool_rate: f64,
    pub retention_base: u32,
    pub retention_per_emerging_leg: u32,
    pub enrolments_per_retention_point: f64,
    pub retention_cap: u32,
    /// Group volume covered by one compliance review
    pub volume_per_review: f64,
    pub review_floor: u64,
}

impl Default for StairStepConstants {
    fn default() -> Self {
        Self {
            tier_thresholds: [4, 5],
            override_rates: [0.08, 0.09, 0.11],
            cycle_days: [30, 36, 42],
            enrolments_per_emerging_leg: 12.0,
            developing_volume_factor: 0.45,
            onboarding_volume_per_enrolment: 320.0,
            leadership_pool_rate: 0.04,
            retention_base: 74,
            retention_per_emerging_leg: 2,
            enrolments_per_retention_point: 6.0,
            retention_cap: 95,
            volume_per_review: 9_000.0,
            review_floor: 3,
        }
    }
}

impl PlanConstants for StairStepConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        let plan = PlanType::StairStep;
        for rate in self.override_rates {
            check_constant(plan, "override_rates", rate)?;
        }
        check_constant(
            plan,
            "enrolments_per_emerging_leg",
            self.enrolments_per_emerging_leg,
        )?;
        check_constant(plan, "developing_volume_factor", self.developing_volume_factor)?;
        check_constant(
            plan,
            "onboarding_volume_per_enrolment",
            self.onboarding_volume_per_enrolment,
        )?;
        check_constant(plan, "leadership_pool_rate", self.leadership_pool_rate)?;
        check_constant(
            plan,
            "enrolments_per_retention_point",
            self.enrolments_per_retention_point,
        )?;
        check_constant(plan, "volume_per_review", self.volume_per_review)?;
        if self.tier_thresholds[0] > self.tier_thresholds[1] {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "tier_thresholds",
                reason: "mid tier must start at or below the top tier",
            });
        }
        if self.retention_cap > 100 {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "retention_cap",
                reason: "retention is a percentage and cannot exceed 100",
            });
        }
        Ok(())
    }
}

impl StairStepConstants {
    /// Tier index (0 entry, 1 mid, 2 top) for a breakaway requirement
    pub fn tier(&self, breakaway_requirement: u32) -> usize {
        if breakaway_requirement >= self.tier_thresholds[1] {
            2
        } else if breakaway_requirement >= self.tier_thresholds[0] {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StairStepResult {
    pub override_rate: f64,
    /// Legs at or approaching manager rank
    pub emerging_legs: u64,
    pub foundation_legs: u64,
    pub managed_volume: f64,
    pub developing_volume: f64,
    pub onboarding_volume: f64,
    pub total_group_volume: f64,
    pub override_payout: f64,
    pub leadership_pool: f64,
    pub breakaway_gap: u64,
    pub status: String,
    pub cycle_days: u32,
    pub retention_rate: u32,
    pub compliance_reviews: u64,
    pub timeline: Vec<TimelineStep>,
}

pub struct StairStepPlan;

fn breakaway_status(gap: u64) -> String {
    match gap {
        0 => "Ready to break away".to_string(),
        1 => "1 leg to qualify".to_string(),
        n => format!("{n} legs to qualify"),
    }
}

impl PlanCalculator for StairStepPlan {
    const PLAN: PlanType = PlanType::StairStep;

    type Input = StairStepInput;
    type Output = StairStepResult;
    type Constants = StairStepConstants;

    fn parameters() -> &'static [ParameterSpec; PARAMETER_COUNT] {
        &PARAMETERS
    }

    fn to_vector(input: &StairStepInput) -> ParameterVector {
        [
            f64::from(input.breakaway_requirement),
            f64::from(input.frontline_leg_count),
            f64::from(input.average_leg_volume),
            f64::from(input.new_enrolments_per_month),
        ]
    }

    fn from_vector(values: &ParameterVector) -> StairStepInput {
        StairStepInput {
            breakaway_requirement: to_u32(values[0]),
            frontline_leg_count: to_u32(values[1]),
            average_leg_volume: to_u32(values[2]),
            new_enrolments_per_month: to_u32(values[3]),
        }
    }

    fn calculate(input: &StairStepInput, constants: &StairStepConstants) -> StairStepResult {
        let tier = constants.tier(input.breakaway_requirement);
        let override_rate = constants.override_rates[tier];

        let requirement = u64::from(input.breakaway_requirement);
        let frontline = u64::from(input.frontline_leg_count);
        let enrolments = f64::from(input.new_enrolments_per_month);
        let leg_volume = f64::from(input.average_leg_volume);

        let growth_legs = to_count(ratio(enrolments, constants.enrolments_per_emerging_leg));
        let emerging_legs = frontline.min(requirement.saturating_add(growth_legs));
        let foundation_legs = frontline.saturating_sub(emerging_legs);

        let managed_volume = emerging_legs as f64 * leg_volume;
        let developing_volume =
            non_negative(foundation_legs as f64 * leg_volume * constants.developing_volume_factor);
        let onboarding_volume =
            non_negative(enrolments * constants.onboarding_volume_per_enrolment);
        let total_group_volume = (managed_volume + developing_volume + onboarding_volume).round();

        let override_payout = non_negative(total_group_volume * override_rate).round();
        let leadership_pool =
            non_negative(total_group_volume * constants.leadership_pool_rate).round();

        let breakaway_gap = requirement.saturating_sub(emerging_legs);
        let status = breakaway_status(breakaway_gap);

        let cycle_days = constants.cycle_days[tier];
        let per_leg = u64::from(constants.retention_per_emerging_leg);
        let retention_points = u64::from(constants.retention_base)
            .saturating_add(emerging_legs.saturating_mul(per_leg))
            .saturating_add(to_count(ratio(enrolments, constants.enrolments_per_retention_point)));
        let retention_rate = retention_points
            .min(u64::from(constants.retention_cap))
            .min(100) as u32;
        let compliance_reviews = constants
            .review_floor
            .max(to_count(ratio(total_group_volume, constants.volume_per_review)));

        let timeline = vec![
            TimelineStep::new(
                "Qualification",
                status.clone(),
                format!(
                    "{emerging_legs} of {frontline} frontline legs on track for manager rank, \
                     {requirement} required"
                ),
            ),
            TimelineStep::new(
                "Group volume",
                format_currency(total_group_volume),
                format!(
                    "{} managed, {} developing, {} onboarding",
                    format_currency(managed_volume),
                    format_currency(developing_volume),
                    format_currency(onboarding_volume)
                ),
            ),
            TimelineStep::new(
                "Override payout",
                format_currency(override_payout),
                format!(
                    "{} override on group volume",
                    format_percent(override_rate * 100.0)
                ),
            ),
            TimelineStep::new(
                "Leadership pool",
                format_currency(leadership_pool),
                format!(
                    "{cycle_days}-day breakaway cycle, {} compliance reviews",
                    format_count(compliance_reviews)
                ),
            ),
        ];

        tracing::debug!(
            emerging_legs,
            total_group_volume,
            override_payout,
            breakaway_gap,
            "Stair-step plan simulated"
        );

        StairStepResult {
            override_rate,
            emerging_legs,
            foundation_legs,
            managed_volume,
            developing_volume,
            onboarding_volume,
            total_group_volume,
            override_payout,
            leadership_pool,
            breakaway_gap,
            status,
            cycle_days,
            retention_rate,
            compliance_reviews,
            timeline,
        }
    }
}

impl PlanOutput for StairStepResult {
    fn headline_payout(&self) -> f64 {
        self.override_payout
    }

    fn timeline(&self) -> &[TimelineStep] {
        &self.timeline
    }

    fn summary(&self) -> Vec<SummaryRow> {
        vec![
            SummaryRow::new("Status", self.status.clone()),
            SummaryRow::new("Emerging legs", format_count(self.emerging_legs)),
            SummaryRow::new("Foundation legs", format_count(self.foundation_legs)),
            SummaryRow::new("Group volume", format_currency(self.total_group_volume)),
            SummaryRow::new("Override rate", format_percent(self.override_rate * 100.0)),
            SummaryRow::new("Override payout", format_currency(self.override_payout)),
            SummaryRow::new("Leadership pool", format_currency(self.leadership_pool)),
            SummaryRow::new("Cycle days", self.cycle_days.to_string()),
            SummaryRow::new(
                "Retention",
                format_percent(f64::from(self.retention_rate)),
            ),
            SummaryRow::new("Compliance reviews", format_count(self.compliance_reviews)),
        ]
    }

    fn is_well_formed(&self) -> bool {
        all_finite_non_negative(&[
            self.override_rate,
            self.managed_volume,
            self.developing_volume,
            self.onboarding_volume,
            self.total_group_volume,
            self.override_payout,
            self.leadership_pool,
        ]) && self.retention_rate <= 100
    }
}
