//! Parameter registry
//!
//! Each plan exposes exactly four parameters. Three or four of them are
//! discrete option sets; at most one is a continuous range with a fixed step.
//! A plan input flattens to an ordered [`ParameterVector`] whose positions
//! match the plan's `parameters()` table, which is what validation, grid
//! enumeration and the memo cache operate on.

use serde::Serialize;

use crate::error::ParameterError;

/// Number of parameters every plan exposes
pub const PARAMETER_COUNT: usize = 4;

/// Parameter values in registry order
pub type ParameterVector = [f64; PARAMETER_COUNT];

/// Tolerance used when matching a value against an option or the step grid
const MATCH_EPSILON: f64 = 1e-9;

/// A continuous parameter sampled on a fixed step grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContinuousRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ContinuousRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Number of step intervals between `min` and `max`
    pub fn intervals(&self) -> usize {
        if !self.is_well_formed() {
            return 0;
        }
        ((self.max - self.min) / self.step + MATCH_EPSILON).floor() as usize
    }

    /// Every value on the step grid, `min` first
    pub fn values(&self) -> Vec<f64> {
        if !self.is_well_formed() {
            return Vec::new();
        }
        (0..=self.intervals())
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }

    /// Midpoint of the range, snapped onto the step grid
    pub fn default_value(&self) -> f64 {
        let half = (self.intervals() as f64 / 2.0).round();
        self.min + half * self.step
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min <= self.max
            && self.step > 0.0
    }

    fn check(&self, name: &'static str, value: f64) -> Result<(), ParameterError> {
        if value < self.min - MATCH_EPSILON || value > self.max + MATCH_EPSILON {
            return Err(ParameterError::OutOfRange {
                name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        let offset = (value - self.min) / self.step;
        if (offset - offset.round()).abs() > MATCH_EPSILON {
            return Err(ParameterError::OffStep {
                name,
                value,
                min: self.min,
                step: self.step,
            });
        }
        Ok(())
    }
}

/// The legal values of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Domain {
    Discrete { options: &'static [f64] },
    Continuous(ContinuousRange),
}

impl Domain {
    /// Default selection: the second discrete option, or the range midpoint
    pub fn default_value(&self) -> f64 {
        match self {
            Domain::Discrete { options } => options
                .get(1)
                .or_else(|| options.first())
                .copied()
                .unwrap_or(0.0),
            Domain::Continuous(range) => range.default_value(),
        }
    }

    /// Every selectable value in ascending order
    pub fn options(&self) -> Vec<f64> {
        match self {
            Domain::Discrete { options } => options.to_vec(),
            Domain::Continuous(range) => range.values(),
        }
    }

    pub fn min(&self) -> f64 {
        match self {
            Domain::Discrete { options } => options.iter().copied().fold(f64::INFINITY, f64::min),
            Domain::Continuous(range) => range.min,
        }
    }

    pub fn max(&self) -> f64 {
        match self {
            Domain::Discrete { options } => {
                options.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            }
            Domain::Continuous(range) => range.max,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Domain::Discrete { options } => options.is_empty(),
            Domain::Continuous(range) => !range.is_well_formed(),
        }
    }

    pub fn check(&self, name: &'static str, value: f64) -> Result<(), ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NonFinite { name, value });
        }
        match self {
            Domain::Discrete { options } => {
                if options.iter().any(|o| (o - value).abs() <= MATCH_EPSILON) {
                    Ok(())
                } else {
                    Err(ParameterError::NotAnOption {
                        name,
                        value,
                        options: *options,
                    })
                }
            }
            Domain::Continuous(range) => range.check(name, value),
        }
    }
}

/// Registry entry describing one plan parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    /// Field name used in inputs, scenario files and `--set name=value`
    pub name: &'static str,
    pub label: &'static str,
    pub domain: Domain,
}

impl ParameterSpec {
    pub const fn discrete(
        name: &'static str,
        label: &'static str,
        options: &'static [f64],
    ) -> Self {
        Self {
            name,
            label,
            domain: Domain::Discrete { options },
        }
    }

    pub const fn continuous(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            domain: Domain::Continuous(ContinuousRange::new(min, max, step)),
        }
    }

    pub fn check(&self, value: f64) -> Result<(), ParameterError> {
        self.domain.check(self.name, value)
    }

    pub fn default_value(&self) -> f64 {
        self.domain.default_value()
    }
}

/// Validate every position of a parameter vector against its registry entry
pub fn validate_vector(
    specs: &[ParameterSpec; PARAMETER_COUNT],
    values: &ParameterVector,
) -> Result<(), ParameterError> {
    for (spec, &value) in specs.iter().zip(values) {
        spec.check(value)?;
    }
    Ok(())
}

/// The default selection of every parameter
pub fn default_vector(specs: &[ParameterSpec; PARAMETER_COUNT]) -> ParameterVector {
    let mut values = [0.0; PARAMETER_COUNT];
    for (slot, spec) in values.iter_mut().zip(specs) {
        *slot = spec.default_value();
    }
    values
}

/// Position of a named parameter in the registry
pub fn position(specs: &[ParameterSpec; PARAMETER_COUNT], name: &str) -> Option<usize> {
    let normalized = name.trim().replace('-', "_");
    specs.iter().position(|s| s.name == normalized)
}

/// Enumerate the Cartesian product of every parameter's options
///
/// Ordered like counting in mixed radix: the first parameter varies fastest.
pub fn grid(specs: &[ParameterSpec; PARAMETER_COUNT]) -> Vec<ParameterVector> {
    let options: Vec<Vec<f64>> = specs.iter().map(|s| s.domain.options()).collect();
    if options.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let total: usize = options.iter().map(Vec::len).product();
    let mut points = Vec::with_capacity(total);
    let mut indices = [0usize; PARAMETER_COUNT];

    loop {
        let mut point = [0.0; PARAMETER_COUNT];
        for (dim, slot) in point.iter_mut().enumerate() {
            *slot = options[dim][indices[dim]];
        }
        points.push(point);

        let mut carry = true;
        for (dim, index) in indices.iter_mut().enumerate() {
            if !carry {
                break;
            }
            *index += 1;
            if *index >= options[dim].len() {
                *index = 0;
            } else {
                carry = false;
            }
        }

        if carry {
            break;
        }
    }

    points
}
