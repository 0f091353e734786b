//! Properties that must hold for every domain-valid input
//!
//! The domains are small enough to check exhaustively, so these tests walk
//! the full parameter grid instead of sampling it.

use crate::config::EngineConfig;
use crate::model::PlanType;
use crate::plans::{
    BinaryInput, BinaryPlan, BoardInput, BoardPlan, GenerationInput, GenerationPlan, MatrixInput,
    MatrixPlan, PlanCalculator, PlanOutput, StairStepInput, StairStepPlan,
};
use crate::simulation::{SimulationInput, SimulationResult, simulate};
use crate::sweep::sweep;

/// Test that identical inputs always produce identical results
#[test]
fn test_simulation_is_deterministic() {
    for plan in PlanType::ALL {
        for input in SimulationInput::grid(plan) {
            assert_eq!(simulate(&input), simulate(&input), "{input:?}");
        }
    }
}

/// Test that every percentage-like output stays within 0-100
#[test]
fn test_percentages_are_clamped_across_grid() {
    for plan in PlanType::ALL {
        for input in SimulationInput::grid(plan) {
            match simulate(&input) {
                SimulationResult::Binary(r) => {
                    assert!((0.0..=1.0).contains(&r.flush_risk), "{input:?}");
                    assert!((0.0..=1.0).contains(&r.weak_share), "{input:?}");
                }
                SimulationResult::Matrix(r) => {
                    assert!(r.fill_percent <= 100, "{input:?}");
                    assert!(r.depth_coverage <= 100, "{input:?}");
                    assert!(r.retention_rate <= 100, "{input:?}");
                }
                SimulationResult::Board(r) => {
                    assert!(r.fill_rate <= 100, "{input:?}");
                }
                SimulationResult::StairStep(r) => {
                    assert!(r.retention_rate <= 100, "{input:?}");
                }
                SimulationResult::Generation(r) => {
                    assert!(r.compliance_score <= 100, "{input:?}");
                    assert!(r.retention_rate <= 100, "{input:?}");
                    assert!(r.activation_rate <= 100, "{input:?}");
                    assert!((0.0..=1.0).contains(&r.payout_ratio), "{input:?}");
                }
            }
        }
    }
}

/// Test that every grid point yields finite, non-negative figures
#[test]
fn test_results_are_well_formed_across_grid() {
    let config = EngineConfig::default();
    for plan in PlanType::ALL {
        let report = sweep(plan, &config);
        for point in &report.points {
            assert!(point.result.is_well_formed(), "{:?}", point.input);
            assert!(point.headline_payout.is_finite());
            assert!(point.headline_payout >= 0.0);
        }
    }
}

#[test]
fn test_binary_payout_monotonic_in_promoters() {
    for base in BinaryPlan::grid() {
        let payouts: Vec<f64> = [180, 320, 520]
            .iter()
            .map(|&promoters| {
                BinaryPlan::simulate(&BinaryInput {
                    active_promoters: promoters,
                    ..base
                })
                .gross_payout
            })
            .collect();
        assert!(payouts.windows(2).all(|w| w[0] <= w[1]), "{base:?}");
    }
}

#[test]
fn test_matrix_payout_monotonic_in_entrants() {
    for base in MatrixPlan::grid() {
        let payouts: Vec<f64> = [80, 150, 240]
            .iter()
            .map(|&entrants| {
                MatrixPlan::simulate(&MatrixInput {
                    monthly_entrants: entrants,
                    ..base
                })
                .payout_volume
            })
            .collect();
        assert!(payouts.windows(2).all(|w| w[0] <= w[1]), "{base:?}");
    }
}

#[test]
fn test_board_payout_monotonic_in_promoters() {
    for base in BoardPlan::grid() {
        let payouts: Vec<f64> = [90, 180, 260]
            .iter()
            .map(|&promoters| {
                BoardPlan::simulate(&BoardInput {
                    active_promoters: promoters,
                    ..base
                })
                .payout_pool
            })
            .collect();
        assert!(payouts.windows(2).all(|w| w[0] <= w[1]), "{base:?}");
    }
}

#[test]
fn test_stair_step_payout_monotonic_in_enrolments() {
    for base in StairStepPlan::grid() {
        let payouts: Vec<f64> = [18, 32, 48]
            .iter()
            .map(|&enrolments| {
                StairStepPlan::simulate(&StairStepInput {
                    new_enrolments_per_month: enrolments,
                    ..base
                })
                .override_payout
            })
            .collect();
        assert!(payouts.windows(2).all(|w| w[0] <= w[1]), "{base:?}");
    }
}

#[test]
fn test_generation_payout_monotonic_in_team_volume() {
    for base in GenerationPlan::grid() {
        let payouts: Vec<f64> = [12_000, 22_000, 36_000]
            .iter()
            .map(|&volume| {
                GenerationPlan::simulate(&GenerationInput {
                    monthly_team_volume: volume,
                    ..base
                })
                .generation_payout
            })
            .collect();
        assert!(payouts.windows(2).all(|w| w[0] <= w[1]), "{base:?}");
    }
}

/// Test that degenerate configurations produce zeros rather than NaN
#[test]
fn test_degenerate_divisors_are_guarded() {
    let matrix = MatrixPlan::calculate(
        &MatrixInput {
            width: 3,
            depth: 0,
            monthly_entrants: 150,
            pack_value: 220,
        },
        &Default::default(),
    );
    assert_eq!(matrix.fill_percent, 0);
    assert_eq!(matrix.completed_levels, 0);
    assert!(matrix.is_well_formed());

    let board = BoardPlan::calculate(
        &BoardInput {
            board_capacity: 0,
            ..BoardInput::default()
        },
        &Default::default(),
    );
    assert_eq!(board.cycles_completed, 0);
    assert_eq!(board.fill_rate, 0);

    let binary = BinaryPlan::calculate(
        &BinaryInput {
            active_promoters: 0,
            ..BinaryInput::default()
        },
        &Default::default(),
    );
    assert_eq!(binary.strong_leg_volume, 0.0);
    assert_eq!(binary.flush_risk, 0.0);
    assert!(binary.flush_risk.is_finite());
}
