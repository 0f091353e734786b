use thiserror::Error;

use crate::model::PlanType;

/// An input value that is not a member of its parameter domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{plan} plan has no parameter named `{name}`")]
    Unknown { plan: PlanType, name: String },

    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name}={value} is not one of the allowed options {options:?}")]
    NotAnOption {
        name: &'static str,
        value: f64,
        options: &'static [f64],
    },

    #[error("{name}={value} is outside the range {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name}={value} is not on the {step} step grid starting at {min}")]
    OffStep {
        name: &'static str,
        value: f64,
        min: f64,
        step: f64,
    },
}

/// A plan constant that cannot produce meaningful results
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{plan} constant `{name}` must be finite, got {value}")]
    NonFinite {
        plan: PlanType,
        name: &'static str,
        value: f64,
    },

    #[error("{plan} constant `{name}` must not be negative, got {value}")]
    Negative {
        plan: PlanType,
        name: &'static str,
        value: f64,
    },

    #[error("{plan} constant `{name}`: {reason}")]
    Inconsistent {
        plan: PlanType,
        name: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
