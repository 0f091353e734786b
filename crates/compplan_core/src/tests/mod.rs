//! Cross-plan tests for the simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Reference scenarios with fully worked expected figures
//! - `properties` - Determinism, monotonicity, clamping and guarded divisions
//! - `neutral` - Behaviour of the lenient entry points on out-of-domain input

mod properties;
