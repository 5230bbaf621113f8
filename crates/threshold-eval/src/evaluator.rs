//! Threshold Evaluator Implementation

use crate::config::{FieldDataType, ThresholdConfig};
use crate::error::ThresholdError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use ward_model::{Reading, VitalSign};

/// Result of evaluating one field value against its configured range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub in_range: bool,
    /// Display string for the configured normal range
    pub normal_range: String,
}

/// One out-of-range field within a reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: VitalSign,
    pub value: f64,
    pub label: String,
    pub normal_range: String,
}

/// Validated, name-indexed threshold configuration.
#[derive(Debug)]
pub struct ThresholdSet {
    by_name: HashMap<String, ThresholdConfig>,
}

impl ThresholdSet {
    /// Build a set from configured entries, rejecting invalid ranges and
    /// duplicate field names
    pub fn new(configs: Vec<ThresholdConfig>) -> Result<Self, ThresholdError> {
        let mut by_name = HashMap::with_capacity(configs.len());
        for config in configs {
            config.validate()?;
            if by_name.contains_key(&config.name) {
                return Err(ThresholdError::DuplicateField(config.name));
            }
            by_name.insert(config.name.clone(), config);
        }
        Ok(Self { by_name })
    }

    /// Empty set; every value is in range
    pub fn empty() -> Self {
        Self { by_name: HashMap::new() }
    }

    /// Look up the config for a field
    pub fn get(&self, field: &str) -> Option<&ThresholdConfig> {
        self.by_name.get(field)
    }

    /// Number of configured fields
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no fields are configured
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Whether a value falls strictly outside its configured normal range.
    ///
    /// Absent values are never out of range; neither are unconfigured,
    /// inactive, or text-typed fields. Pure: identical on the write path
    /// and the read path.
    pub fn is_out_of_range(&self, field: &str, value: Option<f64>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(config) = self.by_name.get(field) else {
            return false;
        };
        if !config.is_active || config.data_type == FieldDataType::Text {
            return false;
        }

        let below = config.normal_min.is_some_and(|min| value < min);
        let above = config.normal_max.is_some_and(|max| value > max);
        if below || above {
            debug!(field, value, "value outside normal range");
        }
        below || above
    }

    /// Evaluate one field value, including the displayable normal range
    pub fn evaluate(&self, field: &str, value: Option<f64>) -> Evaluation {
        let normal_range = self
            .by_name
            .get(field)
            .map(|c| c.normal_range_label())
            .unwrap_or_else(|| "unrestricted".to_string());

        Evaluation {
            in_range: !self.is_out_of_range(field, value),
            normal_range,
        }
    }

    /// All out-of-range fields of one reading
    pub fn violations(&self, reading: &Reading) -> Vec<FieldViolation> {
        reading
            .values
            .iter()
            .filter(|(field, value)| self.is_out_of_range(field.as_str(), Some(**value)))
            .map(|(field, value)| {
                // is_out_of_range returned true, so the config exists
                let config = &self.by_name[field.as_str()];
                FieldViolation {
                    field: *field,
                    value: *value,
                    label: config.label.clone(),
                    normal_range: config.normal_range_label(),
                }
            })
            .collect()
    }
}
