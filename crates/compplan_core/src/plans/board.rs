//! Board / cyclic plan
//!
//! Promoters fill fixed-capacity boards. A full board cycles, pays out a
//! share of its seats' pack value and re-enters part of its members into a
//! fresh board; whoever is left waits in the queue.

use serde::{Deserialize, Serialize};

use super::{
    PlanCalculator, PlanConstants, PlanOutput, all_finite_non_negative, check_constant,
    non_negative, ratio, to_count, to_u32, whole_percent,
};
use crate::domain::{PARAMETER_COUNT, ParameterSpec, ParameterVector};
use crate::error::ConfigError;
use crate::format::{format_count, format_currency, format_percent};
use crate::model::{PlanType, SummaryRow, TimelineStep};

pub const BOARD_CAPACITY_OPTIONS: &[f64] = &[6.0, 9.0, 14.0];
pub const ACTIVE_PROMOTER_OPTIONS: &[f64] = &[90.0, 180.0, 260.0];
pub const REENTRY_RATE_OPTIONS: &[f64] = &[0.30, 0.45, 0.60];

static PARAMETERS: [ParameterSpec; PARAMETER_COUNT] = [
    ParameterSpec::discrete("board_capacity", "Board capacity", BOARD_CAPACITY_OPTIONS),
    ParameterSpec::discrete(
        "active_promoters",
        "Active promoters",
        ACTIVE_PROMOTER_OPTIONS,
    ),
    ParameterSpec::discrete("reentry_rate", "Re-entry rate", REENTRY_RATE_OPTIONS),
    ParameterSpec::continuous(
        "average_pack_value",
        "Average pack value",
        80.0,
        240.0,
        10.0,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardInput {
    pub board_capacity: u32,
    pub active_promoters: u32,
    pub reentry_rate: f64,
    pub average_pack_value: f64,
}

impl Default for BoardInput {
    fn default() -> Self {
        BoardPlan::default_input()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConstants {
    /// Share of a cycled board's pack value paid out
    pub payout_factor: f64,
    pub review_rate: f64,
    pub review_floor: u64,
    pub base_cycle_days: f64,
    /// Board size that cycles in `base_cycle_days`
    pub reference_capacity: f64,
    pub days_per_extra_seat: f64,
    pub min_cycle_days: u32,
}

impl Default for BoardConstants {
    fn default() -> Self {
        Self {
            payout_factor: 0.4,
            review_rate: 0.12,
            review_floor: 5,
            base_cycle_days: 10.0,
            reference_capacity: 6.0,
            days_per_extra_seat: 1.5,
            min_cycle_days: 5,
        }
    }
}

impl PlanConstants for BoardConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        let plan = PlanType::Board;
        check_constant(plan, "payout_factor", self.payout_factor)?;
        check_constant(plan, "review_rate", self.review_rate)?;
        check_constant(plan, "base_cycle_days", self.base_cycle_days)?;
        check_constant(plan, "reference_capacity", self.reference_capacity)?;
        check_constant(plan, "days_per_extra_seat", self.days_per_extra_seat)?;
        if self.payout_factor > 1.0 {
            return Err(ConfigError::Inconsistent {
                plan,
                name: "payout_factor",
                reason: "a board cannot pay out more than its pack value",
            });
        }
        Ok(())
    }
}

impl BoardConstants {
    /// Days for a board of the given capacity to cycle
    pub fn cycle_days(&self, board_capacity: u32) -> u32 {
        let days = self.base_cycle_days
            + (f64::from(board_capacity) - self.reference_capacity) * self.days_per_extra_seat;
        to_u32(days).max(self.min_cycle_days)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardResult {
    pub cycles_completed: u64,
    pub seats_filled: u64,
    pub fill_rate: u32,
    pub payout_per_cycle: f64,
    pub payout_pool: f64,
    pub reentries: u64,
    pub queue_depth: u64,
    pub compliance_reviews: u64,
    pub cycle_days: u32,
    pub timeline: Vec<TimelineStep>,
}

pub struct BoardPlan;

impl PlanCalculator for BoardPlan {
    const PLAN: PlanType = PlanType::Board;

    type Input = BoardInput;
    type Output = BoardResult;
    type Constants = BoardConstants;

    fn parameters() -> &'static [ParameterSpec; PARAMETER_COUNT] {
        &PARAMETERS
    }

    fn to_vector(input: &BoardInput) -> ParameterVector {
        [
            f64::from(input.board_capacity),
            f64::from(input.active_promoters),
            input.reentry_rate,
            input.average_pack_value,
        ]
    }

    fn from_vector(values: &ParameterVector) -> BoardInput {
        BoardInput {
            board_capacity: to_u32(values[0]),
            active_promoters: to_u32(values[1]),
            reentry_rate: values[2],
            average_pack_value: values[3],
        }
    }

    fn calculate(input: &BoardInput, constants: &BoardConstants) -> BoardResult {
        let capacity = u64::from(input.board_capacity);
        let promoters = u64::from(input.active_promoters);

        let (cycles_completed, partial_seats) = if capacity == 0 {
            (0, 0)
        } else {
            (promoters / capacity, promoters % capacity)
        };
        let cycled_seats = cycles_completed * capacity;
        let seats_filled = promoters.min(cycled_seats + partial_seats);
        let fill_rate = whole_percent(ratio(seats_filled as f64, capacity as f64) * 100.0);

        let payout_per_cycle = non_negative(
            capacity as f64 * input.average_pack_value * constants.payout_factor,
        );
        let payout_pool = (cycles_completed as f64 * payout_per_cycle).round();

        let reentries = to_count(
            cycles_completed as f64 * non_negative(input.reentry_rate) * capacity as f64,
        );
        let queue_depth = promoters
            .saturating_sub(cycled_seats)
            .saturating_sub(reentries);

        let compliance_reviews =
            to_count(promoters as f64 * constants.review_rate).max(constants.review_floor);
        let cycle_days = constants.cycle_days(input.board_capacity);

        let timeline = vec![
            TimelineStep::new(
                "Board launch",
                format!("{} seats per board", format_count(capacity)),
                format!("Each board cycles in about {cycle_days} days"),
            ),
            TimelineStep::new(
                "Cycle completion",
                format!("{} cycles", format_count(cycles_completed)),
                format!(
                    "{} of {} promoters seated, board fill {}",
                    format_count(seats_filled),
                    format_count(promoters),
                    format_percent(f64::from(fill_rate))
                ),
            ),
            TimelineStep::new(
                "Re-entry",
                format!("{} re-entries", format_count(reentries)),
                format!(
                    "{} of each cycled board re-enters, {} left in the queue",
                    format_percent(non_negative(input.reentry_rate) * 100.0),
                    format_count(queue_depth)
                ),
            ),
            TimelineStep::new(
                "Payout pool",
                format_currency(payout_pool),
                format!(
                    "{} per cycled board, {} compliance reviews",
                    format_currency(payout_per_cycle),
                    format_count(compliance_reviews)
                ),
            ),
        ];

        tracing::debug!(
            cycles_completed,
            payout_pool,
            reentries,
            queue_depth,
            "Board plan simulated"
        );

        BoardResult {
            cycles_completed,
            seats_filled,
            fill_rate,
            payout_per_cycle,
            payout_pool,
            reentries,
            queue_depth,
            compliance_reviews,
            cycle_days,
            timeline,
        }
    }
}

impl PlanOutput for BoardResult {
    fn headline_payout(&self) -> f64 {
        self.payout_pool
    }

    fn timeline(&self) -> &[TimelineStep] {
        &self.timeline
    }

    fn summary(&self) -> Vec<SummaryRow> {
        vec![
            SummaryRow::new("Cycles completed", format_count(self.cycles_completed)),
            SummaryRow::new("Seats filled", format_count(self.seats_filled)),
            SummaryRow::new("Board fill", format_percent(f64::from(self.fill_rate))),
            SummaryRow::new("Payout per cycle", format_currency(self.payout_per_cycle)),
            SummaryRow::new("Payout pool", format_currency(self.payout_pool)),
            SummaryRow::new("Re-entries", format_count(self.reentries)),
            SummaryRow::new("Queue depth", format_count(self.queue_depth)),
            SummaryRow::new("Compliance reviews", format_count(self.compliance_reviews)),
            SummaryRow::new("Cycle days", self.cycle_days.to_string()),
        ]
    }

    fn is_well_formed(&self) -> bool {
        all_finite_non_negative(&[self.payout_per_cycle, self.payout_pool]) && self.fill_rate <= 100
    }
}
