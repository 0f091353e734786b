//! Exhaustive grid sweep over a plan's parameter domain
//!
//! Every domain is a handful of discrete options plus at most one stepped
//! range, so the full grid is a few hundred points. Each point is an
//! independent pure call; with the `parallel` feature they are fanned out
//! across rayon's pool, and collection keeps grid order either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::model::PlanType;
use crate::simulation::{SimulationInput, SimulationResult, simulate_with};

/// One evaluated grid point
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub input: SimulationInput,
    pub headline_payout: f64,
    pub result: SimulationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub plan: PlanType,
    /// Points in grid order (first parameter varies fastest)
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point with the highest headline payout
    pub fn best(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.headline_payout.total_cmp(&b.headline_payout))
    }

    /// Point with the lowest headline payout
    pub fn worst(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .min_by(|a, b| a.headline_payout.total_cmp(&b.headline_payout))
    }

    /// Points ordered by headline payout, highest first
    pub fn ranked(&self) -> Vec<&SweepPoint> {
        let mut ranked: Vec<&SweepPoint> = self.points.iter().collect();
        ranked.sort_by(|a, b| b.headline_payout.total_cmp(&a.headline_payout));
        ranked
    }

    pub fn all_well_formed(&self) -> bool {
        self.points.iter().all(|p| p.result.is_well_formed())
    }
}

fn evaluate(input: SimulationInput, config: &EngineConfig) -> SweepPoint {
    let result = simulate_with(&input, config);
    SweepPoint {
        input,
        headline_payout: result.headline_payout(),
        result,
    }
}

/// Simulate every domain-valid input of a plan
pub fn sweep(plan: PlanType, config: &EngineConfig) -> SweepReport {
    let inputs = SimulationInput::grid(plan);
    tracing::debug!(plan = %plan, points = inputs.len(), "Starting grid sweep");

    #[cfg(feature = "parallel")]
    let points: Vec<SweepPoint> = inputs
        .into_par_iter()
        .map(|input| evaluate(input, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let points: Vec<SweepPoint> = inputs
        .into_iter()
        .map(|input| evaluate(input, config))
        .collect();

    SweepReport { plan, points }
}
