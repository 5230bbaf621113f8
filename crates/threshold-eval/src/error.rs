//! Threshold Configuration Errors

use thiserror::Error;

/// Errors raised while validating threshold configuration
#[derive(Debug, Clone, Error)]
pub enum ThresholdError {
    /// normal_min exceeds normal_max
    #[error("invalid range for {name}: min {min} > max {max}")]
    InvalidRange { name: String, min: f64, max: f64 },

    /// Two entries share the same field name
    #[error("duplicate threshold config for field: {0}")]
    DuplicateField(String),
}
