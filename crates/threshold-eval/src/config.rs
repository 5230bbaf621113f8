//! Threshold Configuration Entries

use crate::error::ThresholdError;
use serde::{Deserialize, Serialize};

/// Data type of a configured field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDataType {
    Integer,
    Decimal,
    Text,
}

/// Normal range and display metadata for one clinical field.
///
/// Mutated only by administrative configuration; read-only to the
/// evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Unique field key (matches `VitalSign::as_str` for vital signs)
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Display unit
    pub unit: String,
    /// Lower bound of the normal range, inclusive
    pub normal_min: Option<f64>,
    /// Upper bound of the normal range, inclusive
    pub normal_max: Option<f64>,
    /// Field data type; text fields are never range-checked
    pub data_type: FieldDataType,
    /// Inactive fields are never evaluated
    pub is_active: bool,
    /// Position in operator-facing listings
    pub display_order: u32,
}

impl ThresholdConfig {
    /// Check the min/max invariant
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if let (Some(min), Some(max)) = (self.normal_min, self.normal_max) {
            if min > max {
                return Err(ThresholdError::InvalidRange {
                    name: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Display string for the normal range
    pub fn normal_range_label(&self) -> String {
        match (self.normal_min, self.normal_max) {
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            (Some(min), None) => format!(">= {}", min),
            (None, Some(max)) => format!("<= {}", max),
            (None, None) => "unrestricted".to_string(),
        }
    }
}
