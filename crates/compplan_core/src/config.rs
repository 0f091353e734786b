//! Engine configuration
//!
//! The payout factors, rate tiers and share caps baked into each plan are
//! business parameters rather than fixed mathematics. `EngineConfig` groups
//! them per plan; every field defaults to the stock demo values so a partial
//! override file only needs the constants it changes:
//!
//! ```yaml
//! matrix:
//!   leadership_pool_rate: 0.1
//! generation:
//!   generation_percents: [0.12, 0.08, 0.05, 0.03]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::plans::{
    BinaryConstants, BoardConstants, GenerationConstants, MatrixConstants, PlanConstants,
    StairStepConstants,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub binary: BinaryConstants,
    pub matrix: MatrixConstants,
    pub board: BoardConstants,
    pub stair_step: StairStepConstants,
    pub generation: GenerationConstants,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every plan's constants, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.binary.validate()?;
        self.matrix.validate()?;
        self.board.validate()?;
        self.stair_step.validate()?;
        self.generation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "matrix": { "leadership_pool_rate": 0.1 } }"#).unwrap();
        assert_eq!(config.matrix.leadership_pool_rate, 0.1);
        assert_eq!(config.matrix.compression_rate, 0.05);
        assert_eq!(config.binary, BinaryConstants::default());
    }

    #[test]
    fn test_validate_reports_first_invalid_plan() {
        let mut config = EngineConfig::default();
        config.board.payout_factor = -0.4;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Negative { name: "payout_factor", .. }));
        assert!(err.to_string().contains("board"));
    }
}
