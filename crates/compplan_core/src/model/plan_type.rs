//! Closed set of compensation plan topologies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which calculator and parameter domain apply to a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanType {
    Binary,
    Matrix,
    Board,
    StairStep,
    Generation,
}

impl PlanType {
    pub const ALL: [PlanType; 5] = [
        PlanType::Binary,
        PlanType::Matrix,
        PlanType::Board,
        PlanType::StairStep,
        PlanType::Generation,
    ];

    /// Stable lowercase identifier used for parsing and serialization
    pub fn slug(self) -> &'static str {
        match self {
            PlanType::Binary => "binary",
            PlanType::Matrix => "matrix",
            PlanType::Board => "board",
            PlanType::StairStep => "stair-step",
            PlanType::Generation => "generation",
        }
    }

    /// Human readable plan name
    pub fn label(self) -> &'static str {
        match self {
            PlanType::Binary => "Binary / spillover",
            PlanType::Matrix => "Matrix",
            PlanType::Board => "Board / cyclic",
            PlanType::StairStep => "Stair-step / breakaway",
            PlanType::Generation => "Generation",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when a string does not name a plan type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown plan type `{0}` (expected one of: binary, matrix, board, stair-step, generation)"
)]
pub struct UnknownPlanType(pub String);

impl FromStr for PlanType {
    type Err = UnknownPlanType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "binary" | "spillover" => Ok(PlanType::Binary),
            "matrix" => Ok(PlanType::Matrix),
            "board" | "cyclic" => Ok(PlanType::Board),
            "stair-step" | "stairstep" | "breakaway" => Ok(PlanType::StairStep),
            "generation" => Ok(PlanType::Generation),
            _ => Err(UnknownPlanType(s.to_string())),
        }
    }
}
