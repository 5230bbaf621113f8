//! Alert Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use threshold_eval::FieldViolation;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Alert category; drives severity mapping and retention windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    PatientCritical,
    CapacityHigh,
    CapacityLow,
}

impl AlertCategory {
    /// Severity for alerts of this category
    pub fn severity(&self) -> Severity {
        match self {
            AlertCategory::PatientCritical => Severity::High,
            AlertCategory::CapacityHigh | AlertCategory::CapacityLow => Severity::Medium,
        }
    }
}

/// Category-specific alert payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AlertPayload {
    PatientCritical {
        patient_id: String,
        patient_name: String,
        bed_number: String,
        violations: Vec<FieldViolation>,
    },
    CapacityHigh {
        total_beds: u32,
        occupied_beds: u32,
        occupancy_ratio: f64,
    },
    CapacityLow {
        available_beds: u32,
    },
}

/// A candidate or active alert.
///
/// Alerts are ephemeral: recomputed every refresh cycle, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Deterministic identity recognizing the same occurrence across cycles
    pub identity: String,
    pub category: AlertCategory,
    pub severity: Severity,
    pub payload: AlertPayload,
    /// Human-readable operator message
    pub message: String,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(AlertCategory::PatientCritical.severity(), Severity::High);
        assert_eq!(AlertCategory::CapacityHigh.severity(), Severity::Medium);
        assert_eq!(AlertCategory::CapacityLow.severity(), Severity::Medium);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }
}
