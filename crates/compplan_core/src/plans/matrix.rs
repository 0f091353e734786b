//! Matrix plan
//!
//! A fixed-width, fixed-depth tree filled top-down and breadth-first. Level
//! `i` holds `width^i` positions; a level counts as complete only when every
//! position in it is filled.

use serde::{Deserialize, Serialize};

use super::{
    PlanCalculator, PlanConstants, PlanOutput, all_finite_non_negative, check_constant,
    non_negative, ratio, to_count, to_u32, whole_percent,
};
use crate::domain::{PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::ConfigError;
use crate::format::{format_count, format_currency, format_percent};
use crate::model::{PlanType, SummaryRow, TimelineStep};

pub const WIDTH_OPTIONS: &[f64] = &[2.0, 3.0, 4.0];
pub const DEPTH_OPTIONS: &[f64] = &[6.0, 8.0, 10.0];
pub const MONTHLY_ENTRANT_OPTIONS: &[f64] = &[80.0, 150.0, 240.0];
pub const PACK_VALUE_OPTIONS: &[f64] = &[150.0, 220.0, 320.0];

/// Levels beyond this are not modelled; any width above one has saturated
/// the slot count long before
const MAX_MODELLED_DEPTH: u32 = 64;

static PARAMETERS: [ParameterSpec; PARAMETER_COUNT] = [
    ParameterSpec::discrete("width", "Matrix width", WIDTH_OPTIONS),
    ParameterSpec::discrete("depth", "Matrix depth", DEPTH_OPTIONS),
    ParameterSpec::discrete(
        "monthly_entrants",
        "Monthly entrants",
        MONTHLY_ENTRANT_OPTIONS,
    ),
    ParameterSpec::discrete("pack_value", "Pack value", PACK_VALUE_OPTIONS),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixInput {
    pub width: u32,
    pub depth: u32,
    pub monthly_entrants: u32,
    pub pack_value: u32,
}

impl Default for MatrixInput {
    fn default() -> Self {
        MatrixPlan::default_input()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConstants {
    pub leadership_pool_rate: f64,
    /// Share of unfilled capacity value saved through compression
    pub compression_rate: f64,
    /// Months for a cohort to mature in a matrix up to six levels deep
    pub shallow_cycle_months: u32,
    /// Months for exactly eight levels
    pub standard_cycle_months: u32,
    /// Months for every other depth
    pub deep_cycle_months: u32,
    pub retention_base: u32,
    pub retention_cap: u32,
    pub review_rate: f64,
    pub review_floor: u64,
    pub audit_ready_threshold: u32,
    pub monitor_threshold: u32,
}

impl Default for MatrixConstants {
    fn default() -> Self {
        Self {
            leadership_pool_rate: 0.08,
            compression_rate: 0.05,
            shallow_cycle_months: 3,
            standard_cycle_months: 4,
            deep_cycle_months: 5,
            retention_base: 76,
            retention_cap: 94,
            review_rate: 0.06,
            review_floor: 3,
            audit_ready_threshold: 85,
            monitor_threshold: 65,
        }
    }
}

impl PlanConstants for MatrixConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        let plan = PlanType::Matrix;
        check_constant(plan, "leadership_pool_rate", self.leadership_pool_rate)?;
        check_constant(plan, "compression_rate", self.compression_rate)?;
        check_constant(plan, "review_rate", self.review_rate)?;
        if self.retention_cap > 100 {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "retention_cap",
                reason: "retention is a percentage and cannot exceed 100",
            });
        }
        if self.monitor_threshold > self.audit_ready_threshold {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "monitor_threshold",
                reason: "monitor threshold must not exceed the audit-ready threshold",
            });
        }
        Ok(())
    }
}

impl MatrixConstants {
    /// Months for a cohort to reach production maturity at a given depth
    pub fn cycle_months(&self, depth: u32) -> u32 {
        if depth <= 6 {
            self.shallow_cycle_months
        } else if depth == 8 {
            self.standard_cycle_months
        } else {
            self.deep_cycle_months
        }
    }
}

/// How closely the matrix needs to be supervised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OversightLevel {
    AuditReady,
    MonitorClosely,
    #[default]
    BuildMomentum,
}

impl OversightLevel {
    pub fn classify(fill_percent: u32, constants: &MatrixConstants) -> Self {
        if fill_percent >= constants.audit_ready_threshold {
            OversightLevel::AuditReady
        } else if fill_percent >= constants.monitor_threshold {
            OversightLevel::MonitorClosely
        } else {
            OversightLevel::BuildMomentum
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OversightLevel::AuditReady => "Audit-ready",
            OversightLevel::MonitorClosely => "Monitor closely",
            OversightLevel::BuildMomentum => "Build momentum",
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            OversightLevel::AuditReady => {
                "Capacity is nearly committed. \
                 Schedule the compliance audit before the next cohort lands."
            }
            OversightLevel::MonitorClosely => {
                "Fill is healthy but uneven. Review spillover placements and retention every cycle."
            }
            OversightLevel::BuildMomentum => {
                "Most of the matrix is still open. Focus on enrolment so the upper levels complete."
            }
        }
    }
}

/// Fill state of one matrix level (level 0 is the sponsor position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFill {
    pub level: u32,
    pub capacity: u64,
    pub filled: u64,
}

impl LevelFill {
    pub fn is_complete(&self) -> bool {
        self.filled == self.capacity
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixResult {
    pub total_slots: u64,
    pub cycle_months: u32,
    pub projected_fill: u64,
    pub fill_percent: u32,
    pub completed_levels: u32,
    pub depth_coverage: u32,
    /// Placements beyond the first two levels, which need spillover logic
    pub spillover_window: u64,
    pub payout_volume: f64,
    pub leadership_pool: f64,
    pub compression_savings: f64,
    pub oversight_level: OversightLevel,
    pub advisory: String,
    pub retention_rate: u32,
    pub compliance_reviews: u64,
    pub levels: Vec<LevelFill>,
    pub timeline: Vec<TimelineStep>,
}

pub struct MatrixPlan;

/// `width^i` for every level; empty when either dimension is zero
fn level_capacities(width: u32, depth: u32) -> Vec<u64> {
    if width == 0 {
        return Vec::new();
    }
    let width = u64::from(width);
    (0..depth.min(MAX_MODELLED_DEPTH))
        .map(|level| width.saturating_pow(level))
        .collect()
}

/// Walk the fill down the levels; a partially filled level ends the walk
fn walk_levels(capacities: &[u64], projected_fill: u64) -> Vec<LevelFill> {
    let mut remaining = projected_fill;
    capacities
        .iter()
        .enumerate()
        .map(|(level, &capacity)| {
            let filled = remaining.min(capacity);
            if remaining >= capacity {
                remaining -= capacity;
            } else {
                remaining = 0;
            }
            LevelFill {
                level: level as u32,
                capacity,
                filled,
            }
        })
        .collect()
}

impl PlanCalculator for MatrixPlan {
    const PLAN: PlanType = PlanType::Matrix;

    type Input = MatrixInput;
    type Output = MatrixResult;
    type Constants = MatrixConstants;

    fn parameters() -> &'static [ParameterSpec; PARAMETER_COUNT] {
        &PARAMETERS
    }

    fn to_vector(input: &MatrixInput) -> ParameterVector {
        [
            f64::from(input.width),
            f64::from(input.depth),
            f64::from(input.monthly_entrants),
            f64::from(input.pack_value),
        ]
    }

    fn from_vector(values: &ParameterVector) -> MatrixInput {
        MatrixInput {
            width: to_u32(values[0]),
            depth: to_u32(values[1]),
            monthly_entrants: to_u32(values[2]),
            pack_value: to_u32(values[3]),
        }
    }

    fn calculate(input: &MatrixInput, constants: &MatrixConstants) -> MatrixResult {
        let capacities = level_capacities(input.width, input.depth);
        let total_slots = capacities
            .iter()
            .fold(0u64, |total, &capacity| total.saturating_add(capacity));

        let cycle_months = constants.cycle_months(input.depth);
        let projected_fill = total_slots.min(
            u64::from(input.monthly_entrants).saturating_mul(u64::from(cycle_months)),
        );
        let fill_percent = whole_percent(ratio(projected_fill as f64, total_slots as f64) * 100.0);

        let levels = walk_levels(&capacities, projected_fill);
        let completed_levels = levels
            .iter()
            .take_while(|level| level.is_complete())
            .count() as u32;
        let depth_coverage = whole_percent(
            ratio(f64::from(completed_levels), f64::from(input.depth)) * 100.0,
        );

        let width = u64::from(input.width);
        let first_two_levels = width.saturating_add(width.saturating_mul(width));
        let spillover_window = projected_fill.saturating_sub(first_two_levels);

        let pack_value = f64::from(input.pack_value);
        let payout_volume = non_negative(projected_fill as f64 * pack_value);
        let leadership_pool = non_negative(payout_volume * constants.leadership_pool_rate);
        let open_slots = total_slots.saturating_sub(projected_fill);
        let compression_savings =
            non_negative(open_slots as f64 * pack_value * constants.compression_rate);

        let oversight_level = OversightLevel::classify(fill_percent, constants);
        let retention_rate = constants
            .retention_cap
            .min(
                constants
                    .retention_base
                    .saturating_add((f64::from(fill_percent) / 3.0).round() as u32),
            )
            .min(100);
        let compliance_reviews = constants
            .review_floor
            .max(to_count(projected_fill as f64 * constants.review_rate));

        let timeline = vec![
            TimelineStep::new(
                "Capacity model",
                format!("{} slots", format_count(total_slots)),
                format!("{} wide across {} levels", input.width, input.depth),
            ),
            TimelineStep::new(
                "Cohort fill",
                format!("{} placed", format_count(projected_fill)),
                format!(
                    "{} of capacity after {} months, {} levels complete",
                    format_percent(f64::from(fill_percent)),
                    cycle_months,
                    completed_levels
                ),
            ),
            TimelineStep::new(
                "Spillover window",
                format!("{} placements", format_count(spillover_window)),
                "Positions beyond the first two levels rely on spillover".to_string(),
            ),
            TimelineStep::new(
                "Leadership pool",
                format_currency(leadership_pool),
                format!(
                    "{} saved through compression of open slots",
                    format_currency(compression_savings)
                ),
            ),
        ];

        tracing::debug!(
            total_slots,
            projected_fill,
            fill_percent,
            completed_levels,
            "Matrix plan simulated"
        );

        MatrixResult {
            total_slots,
            cycle_months,
            projected_fill,
            fill_percent,
            completed_levels,
            depth_coverage,
            spillover_window,
            payout_volume,
            leadership_pool,
            compression_savings,
            oversight_level,
            advisory: oversight_level.advisory().to_string(),
            retention_rate,
            compliance_reviews,
            levels,
            timeline,
        }
    }
}

impl PlanOutput for MatrixResult {
    fn headline_payout(&self) -> f64 {
        self.payout_volume
    }

    fn timeline(&self) -> &[TimelineStep] {
        &self.timeline
    }

    fn summary(&self) -> Vec<SummaryRow> {
        vec![
            SummaryRow::new("Total slots", format_count(self.total_slots)),
            SummaryRow::new("Projected fill", format_count(self.projected_fill)),
            SummaryRow::new("Fill", format_percent(f64::from(self.fill_percent))),
            SummaryRow::new("Completed levels", self.completed_levels.to_string()),
            SummaryRow::new(
                "Depth coverage",
                format_percent(f64::from(self.depth_coverage)),
            ),
            SummaryRow::new("Spillover window", format_count(self.spillover_window)),
            SummaryRow::new("Payout volume", format_currency(self.payout_volume)),
            SummaryRow::new("Leadership pool", format_currency(self.leadership_pool)),
            SummaryRow::new(
                "Compression savings",
                format_currency(self.compression_savings),
            ),
            SummaryRow::new("Oversight", self.oversight_level.label()),
            SummaryRow::new(
                "Retention",
                format_percent(f64::from(self.retention_rate)),
            ),
            SummaryRow::new("Compliance reviews", format_count(self.compliance_reviews)),
        ]
    }

    fn is_well_formed(&self) -> bool {
        all_finite_non_negative(&[
            self.payout_volume,
            self.leadership_pool,
            self.compression_savings,
        ]) && self.projected_fill <= self.total_slots
            && self.fill_percent <= 100
            && self.depth_coverage <= 100
            && self.retention_rate <= 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(width: u32, depth: u32, monthly_entrants: u32, pack_value: u32) -> MatrixInput {
        MatrixInput {
            width,
            depth,
            monthly_entrants,
            pack_value,
        }
    }

    #[test]
    fn test_level_capacities() {
        assert_eq!(level_capacities(3, 4), vec![1, 3, 9, 27]);
        assert!(level_capacities(0, 6).is_empty());
        assert!(level_capacities(3, 0).is_empty());
    }

    #[test]
    fn test_cycle_month_policy() {
        let constants = MatrixConstants::default();
        assert_eq!(constants.cycle_months(6), 3);
        assert_eq!(constants.cycle_months(8), 4);
        assert_eq!(constants.cycle_months(10), 5);
        assert_eq!(constants.cycle_months(7), 5);
    }

    #[test]
    fn test_level_walk_stops_at_partial_level() {
        let levels = walk_levels(&[1, 3, 9, 27], 20);
        let filled: Vec<u64> = levels.iter().map(|l| l.filled).collect();
        assert_eq!(filled, vec![1, 3, 9, 7]);
        assert_eq!(levels.iter().filter(|l| l.is_complete()).count(), 3);
    }

    #[test]
    fn test_level_walk_exact_fill_completes_level() {
        let levels = walk_levels(&[1, 3, 9], 4);
        assert!(levels[1].is_complete());
        assert_eq!(levels[2].filled, 0);
    }

    #[test]
    fn test_full_matrix_is_audit_ready() {
        // 2 wide, 6 deep: 63 slots, 240 entrants x 3 months saturates it
        let result = MatrixPlan::simulate(&input(2, 6, 240, 150));
        assert_eq!(result.total_slots, 63);
        assert_eq!(result.projected_fill, 63);
        assert_eq!(result.fill_percent, 100);
        assert_eq!(result.completed_levels, 6);
        assert_eq!(result.depth_coverage, 100);
        assert_eq!(result.compression_savings, 0.0);
        assert_eq!(result.oversight_level, OversightLevel::AuditReady);
        assert_eq!(result.retention_rate, 94);
    }

    #[test]
    fn test_monitor_band() {
        // 4 wide, 6 deep: 1365 slots; 240 x 3 = 720 placed is 53%
        let result = MatrixPlan::simulate(&input(4, 6, 240, 150));
        assert_eq!(result.total_slots, 1_365);
        assert_eq!(result.fill_percent, 53);
        assert_eq!(result.oversight_level, OversightLevel::BuildMomentum);

        let constants = MatrixConstants {
            monitor_threshold: 50,
            ..Default::default()
        };
        let relaxed = MatrixPlan::simulate_with(&input(4, 6, 240, 150), &constants);
        assert_eq!(relaxed.oversight_level, OversightLevel::MonitorClosely);
        assert_eq!(relaxed.advisory, OversightLevel::MonitorClosely.advisory());
    }

    #[test]
    fn test_zero_depth_is_guarded() {
        let result = MatrixPlan::calculate(&input(3, 0, 150, 220), &MatrixConstants::default());
        assert_eq!(result.total_slots, 0);
        assert_eq!(result.projected_fill, 0);
        assert_eq!(result.fill_percent, 0);
        assert_eq!(result.completed_levels, 0);
        assert_eq!(result.depth_coverage, 0);
        assert!(result.is_well_formed());
    }

    #[test]
    fn test_zero_width_is_guarded() {
        let result = MatrixPlan::calculate(&input(0, 8, 150, 220), &MatrixConstants::default());
        assert_eq!(result.total_slots, 0);
        assert_eq!(result.fill_percent, 0);
        assert_eq!(result.spillover_window, 0);
        assert!(result.is_well_formed());
    }

    #[test]
    fn test_unbounded_depth_is_capped() {
        let result =
            MatrixPlan::calculate(&input(4, u32::MAX, 240, 320), &MatrixConstants::default());
        assert_eq!(result.levels.len(), MAX_MODELLED_DEPTH as usize);
        assert!(result.is_well_formed());
    }

    #[test]
    fn test_constants_validation() {
        assert!(MatrixConstants::default().validate().is_ok());
        let inverted = MatrixConstants {
            monitor_threshold: 90,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_default_timeline() {
        let result = MatrixPlan::simulate(&MatrixInput::default());
        let titles: Vec<&str> = result.timeline.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Capacity model", "Cohort fill", "Spillover window", "Leadership pool"]
        );
        assert_eq!(result.timeline[0].value, "3,280 slots");
        assert_eq!(result.timeline[0].hint, "3 wide across 8 levels");
        assert_eq!(result.timeline[1].value, "600 placed");
        assert_eq!(result.timeline[2].value, "588 placements");
        assert_eq!(result.timeline[3].value, "$10,560");
    }
}
