//! Binary / spillover plan
//!
//! Every position has two legs. Pairs are matched against the weaker leg
//! only; whatever the strong leg carries beyond the matched volume is at
//! risk of being flushed. Upline spillover lifts the weak leg's share of
//! total volume toward a cap.

use serde::{Deserialize, Serialize};

use super::{
    PlanCalculator, PlanConstants, PlanOutput, all_finite_non_negative, check_constant,
    non_negative, ratio, to_count, to_u32,
};
use crate::domain::{PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::ConfigError;
use crate::format::{format_count, format_currency, format_percent};
use crate::model::{PlanType, SummaryRow, TimelineStep};

pub const PAIR_REQUIREMENT_OPTIONS: &[f64] = &[150.0, 300.0, 450.0];
pub const ACTIVE_PROMOTER_OPTIONS: &[f64] = &[180.0, 320.0, 520.0];
pub const SPILLOVER_SUPPORT_OPTIONS: &[f64] = &[0.18, 0.28, 0.38];

static PARAMETERS: [ParameterSpec; PARAMETER_COUNT] = [
    ParameterSpec::discrete(
        "pair_requirement",
        "Pair requirement (volume per leg)",
        PAIR_REQUIREMENT_OPTIONS,
    ),
    ParameterSpec::discrete(
        "active_promoters",
        "Active promoters",
        ACTIVE_PROMOTER_OPTIONS,
    ),
    ParameterSpec::discrete(
        "spillover_support_ratio",
        "Spillover support ratio",
        SPILLOVER_SUPPORT_OPTIONS,
    ),
    ParameterSpec::continuous(
        "average_order_value",
        "Average order value",
        80.0,
        220.0,
        10.0,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryInput {
    pub pair_requirement: u32,
    pub active_promoters: u32,
    /// Fraction of recruits placed by upline spillover
    pub spillover_support_ratio: f64,
    pub average_order_value: f64,
}

impl Default for BinaryInput {
    fn default() -> Self {
        BinaryPlan::default_input()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConstants {
    /// Weak-leg share of volume with no spillover support
    pub base_weak_share: f64,
    pub weak_share_cap: f64,
    /// Share added when spillover support is at the top of its domain
    pub weak_share_spread: f64,
    /// Fraction of the pair requirement paid per matched pair
    pub payout_rate: f64,
}

impl Default for BinaryConstants {
    fn default() -> Self {
        Self {
            base_weak_share: 0.44,
            weak_share_cap: 0.52,
            weak_share_spread: 0.08,
            payout_rate: 0.12,
        }
    }
}

impl PlanConstants for BinaryConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        let plan = PlanType::Binary;
        check_constant(plan, "base_weak_share", self.base_weak_share)?;
        check_constant(plan, "weak_share_cap", self.weak_share_cap)?;
        check_constant(plan, "weak_share_spread", self.weak_share_spread)?;
        check_constant(plan, "payout_rate", self.payout_rate)?;
        if self.weak_share_cap > 1.0 {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "weak_share_cap",
                reason: "a leg cannot carry more than all of the volume",
            });
        }
        if self.weak_share_cap < self.base_weak_share {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "weak_share_cap",
                reason: "cap must not be below the base weak share",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryResult {
    pub total_volume: f64,
    /// Fraction of total volume landing on the weak leg
    pub weak_share: f64,
    pub weak_leg_volume: f64,
    pub strong_leg_volume: f64,
    pub matched_pairs: u64,
    pub payout_per_pair: f64,
    pub gross_payout: f64,
    /// Strong-leg volume left after matching, never negative
    pub carry_over_volume: f64,
    /// Fraction (0-1) of the strong leg exposed to flush rules
    pub flush_risk: f64,
    pub spillover_placements: u64,
    pub timeline: Vec<TimelineStep>,
}

pub struct BinaryPlan;

/// Position of a spillover ratio within its domain, 0 at the minimum and 1 at the maximum
fn spillover_lift(spillover_support_ratio: f64) -> f64 {
    let min = SPILLOVER_SUPPORT_OPTIONS
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max = SPILLOVER_SUPPORT_OPTIONS
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    ratio(spillover_support_ratio - min, max - min).clamp(0.0, 1.0)
}

impl PlanCalculator for BinaryPlan {
    const PLAN: PlanType = PlanType::Binary;

    type Input = BinaryInput;
    type Output = BinaryResult;
    type Constants = BinaryConstants;

    fn parameters() -> &'static [ParameterSpec; PARAMETER_COUNT] {
        &PARAMETERS
    }

    fn to_vector(input: &BinaryInput) -> ParameterVector {
        [
            f64::from(input.pair_requirement),
            f64::from(input.active_promoters),
            input.spillover_support_ratio,
            input.average_order_value,
        ]
    }

    fn from_vector(values: &ParameterVector) -> BinaryInput {
        BinaryInput {
            pair_requirement: to_u32(values[0]),
            active_promoters: to_u32(values[1]),
            spillover_support_ratio: values[2],
            average_order_value: values[3],
        }
    }

    fn calculate(input: &BinaryInput, constants: &BinaryConstants) -> BinaryResult {
        let promoters = f64::from(input.active_promoters);
        let pair_requirement = f64::from(input.pair_requirement);
        let support = non_negative(input.spillover_support_ratio);

        let total_volume = non_negative(promoters * input.average_order_value);

        let lift = spillover_lift(support);
        let weak_share = (constants.base_weak_share + lift * constants.weak_share_spread)
            .min(constants.weak_share_cap)
            .clamp(0.0, 1.0);
        let weak_leg_volume = total_volume * weak_share;
        let strong_leg_volume = total_volume - weak_leg_volume;

        let matched_pairs = if pair_requirement > 0.0 {
            (weak_leg_volume / pair_requirement).floor()
        } else {
            0.0
        };
        let payout_per_pair = non_negative(pair_requirement * constants.payout_rate);
        let gross_payout = non_negative(matched_pairs * payout_per_pair);

        // Negative when the weak leg outweighs the strong one; only the
        // positive part is carried or flushed
        let raw_carry_over = strong_leg_volume - matched_pairs * pair_requirement;
        let carry_over_volume = raw_carry_over.max(0.0);
        let flush_risk = ratio(carry_over_volume, strong_leg_volume).clamp(0.0, 1.0);

        let spillover_placements = to_count(promoters * support);
        let matched_pairs = to_count(matched_pairs);

        let timeline = vec![
            TimelineStep::new(
                "Volume forecast",
                format_currency(total_volume),
                format!(
                    "{} weak leg / {} strong leg",
                    format_currency(weak_leg_volume),
                    format_currency(strong_leg_volume)
                ),
            ),
            TimelineStep::new(
                "Spillover placement",
                format!("{} placements", format_count(spillover_placements)),
                format!(
                    "{} of recruits placed by upline spillover",
                    format_percent(support * 100.0)
                ),
            ),
            TimelineStep::new(
                "Compliance sweep",
                format!("{} flush risk", format_percent(flush_risk * 100.0)),
                format!(
                    "{} carry-over held on the strong leg",
                    format_currency(carry_over_volume)
                ),
            ),
            TimelineStep::new(
                "Payout optimisation",
                format_currency(gross_payout),
                format!(
                    "{} matched pairs at {} per pair",
                    format_count(matched_pairs),
                    format_currency(payout_per_pair)
                ),
            ),
        ];

        tracing::debug!(
            total_volume,
            weak_share,
            matched_pairs,
            gross_payout,
            "Binary plan simulated"
        );

        BinaryResult {
            total_volume,
            weak_share,
            weak_leg_volume,
            strong_leg_volume,
            matched_pairs,
            payout_per_pair,
            gross_payout,
            carry_over_volume,
            flush_risk,
            spillover_placements,
            timeline,
        }
    }
}

impl PlanOutput for BinaryResult {
    fn headline_payout(&self) -> f64 {
        self.gross_payout
    }

    fn timeline(&self) -> &[TimelineStep] {
        &self.timeline
    }

    fn summary(&self) -> Vec<SummaryRow> {
        vec![
            SummaryRow::new("Total volume", format_currency(self.total_volume)),
            SummaryRow::new("Weak leg volume", format_currency(self.weak_leg_volume)),
            SummaryRow::new("Strong leg volume", format_currency(self.strong_leg_volume)),
            SummaryRow::new("Matched pairs", format_count(self.matched_pairs)),
            SummaryRow::new("Payout per pair", format_currency(self.payout_per_pair)),
            SummaryRow::new("Gross payout", format_currency(self.gross_payout)),
            SummaryRow::new("Carry-over volume", format_currency(self.carry_over_volume)),
            SummaryRow::new("Flush risk", format_percent(self.flush_risk * 100.0)),
            SummaryRow::new(
                "Spillover placements",
                format_count(self.spillover_placements),
            ),
        ]
    }

    fn is_well_formed(&self) -> bool {
        all_finite_non_negative(&[
            self.total_volume,
            self.weak_share,
            self.weak_leg_volume,
            self.strong_leg_volume,
            self.payout_per_pair,
            self.gross_payout,
            self.carry_over_volume,
            self.flush_risk,
        ]) && self.weak_share <= 1.0
            && self.flush_risk <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pair: u32, promoters: u32, support: f64, order_value: f64) -> BinaryInput {
        BinaryInput {
            pair_requirement: pair,
            active_promoters: promoters,
            spillover_support_ratio: support,
            average_order_value: order_value,
        }
    }

    #[test]
    fn test_default_input_uses_second_options() {
        let default = BinaryInput::default();
        assert_eq!(default.pair_requirement, 300);
        assert_eq!(default.active_promoters, 320);
        assert!((default.spillover_support_ratio - 0.28).abs() < 1e-12);
        assert_eq!(default.average_order_value, 150.0);
        assert!(BinaryPlan::validate(&default).is_ok());
    }

    #[test]
    fn test_minimum_support_uses_base_share() {
        let result = BinaryPlan::simulate(&input(150, 180, 0.18, 100.0));

        assert_eq!(result.total_volume, 18_000.0);
        assert!((result.weak_share - 0.44).abs() < 1e-12);
        assert!((result.weak_leg_volume - 7_920.0).abs() < 1e-6);
        assert!((result.strong_leg_volume - 10_080.0).abs() < 1e-6);
        assert_eq!(result.matched_pairs, 52);
        assert!((result.payout_per_pair - 18.0).abs() < 1e-9);
        assert!((result.gross_payout - 936.0).abs() < 1e-6);
        assert!((result.carry_over_volume - 2_280.0).abs() < 1e-6);
        assert!((result.flush_risk - 2_280.0 / 10_080.0).abs() < 1e-9);
        assert_eq!(result.spillover_placements, 32);
    }

    #[test]
    fn test_default_scenario() {
        let result = BinaryPlan::simulate(&BinaryInput::default());

        assert_eq!(result.total_volume, 48_000.0);
        assert!((result.weak_share - 0.48).abs() < 1e-9);
        assert_eq!(result.matched_pairs, 76);
        assert!((result.gross_payout - 2_736.0).abs() < 1e-6);
        assert!((result.carry_over_volume - 2_160.0).abs() < 1e-6);
        assert_eq!(result.spillover_placements, 90);
    }

    #[test]
    fn test_weak_share_is_capped() {
        let constants = BinaryConstants {
            weak_share_spread: 0.5,
            ..Default::default()
        };
        let result = BinaryPlan::calculate(&input(300, 320, 0.38, 150.0), &constants);
        assert!((result.weak_share - constants.weak_share_cap).abs() < 1e-12);
    }

    #[test]
    fn test_weak_leg_larger_than_strong_clamps_carry_over() {
        // At maximum support the weak leg carries 52% of volume, so matched
        // demand can exceed the strong leg
        let result = BinaryPlan::simulate(&input(150, 520, 0.38, 220.0));

        assert!(result.weak_leg_volume > result.strong_leg_volume);
        assert_eq!(result.matched_pairs, 396);
        assert_eq!(result.carry_over_volume, 0.0);
        assert_eq!(result.flush_risk, 0.0);
        assert!(result.is_well_formed());
    }

    #[test]
    fn test_volume_is_conserved_across_grid() {
        for point in BinaryPlan::grid() {
            let result = BinaryPlan::simulate(&point);
            let sum = result.weak_leg_volume + result.strong_leg_volume;
            assert!(
                (sum - result.total_volume).abs() < 1e-6,
                "volume not conserved for {point:?}"
            );
        }
    }

    #[test]
    fn test_zero_pair_requirement_is_rejected_and_guarded() {
        let degenerate = input(0, 320, 0.28, 150.0);
        assert!(BinaryPlan::validate(&degenerate).is_err());
        assert_eq!(BinaryPlan::simulate(&degenerate), BinaryResult::default());

        let raw = BinaryPlan::calculate(&degenerate, &BinaryConstants::default());
        assert_eq!(raw.matched_pairs, 0);
        assert_eq!(raw.gross_payout, 0.0);
        assert!(raw.is_well_formed());
    }

    #[test]
    fn test_zero_volume_has_no_flush_risk() {
        let raw = BinaryPlan::calculate(&input(300, 0, 0.28, 150.0), &BinaryConstants::default());
        assert_eq!(raw.strong_leg_volume, 0.0);
        assert_eq!(raw.flush_risk, 0.0);
    }

    #[test]
    fn test_timeline_has_four_steps() {
        let result = BinaryPlan::simulate(&BinaryInput::default());
        let titles: Vec<&str> = result.timeline.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Volume forecast",
                "Spillover placement",
                "Compliance sweep",
                "Payout optimisation"
            ]
        );
        assert_eq!(result.timeline[0].value, "$48,000");
        assert_eq!(result.timeline[3].value, "$2,736");
    }

    #[test]
    fn test_constants_validation() {
        assert!(BinaryConstants::default().validate().is_ok());

        let inverted = BinaryConstants {
            weak_share_cap: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::Inconsistent { name: "weak_share_cap", .. })
        ));

        let nan_rate = BinaryConstants {
            payout_rate: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(nan_rate.validate(), Err(ConfigError::NonFinite { .. })));
    }
}
