//! Vital Sign Field Vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A vital-sign field name was not recognized
#[derive(Debug, Clone, Error)]
#[error("unknown vital sign field: {0}")]
pub struct UnknownVitalSign(pub String);

/// The closed set of monitored vital-sign fields.
///
/// The snake_case string form is the stable key used in threshold
/// configuration and alert payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalSign {
    HeartRate,
    RespiratoryRate,
    SystolicBp,
    DiastolicBp,
    Spo2,
    Temperature,
    GcsScore,
    PainScale,
    Glucose,
    UrineOutput,
}

impl VitalSign {
    /// All monitored fields, in display order
    pub const ALL: [VitalSign; 10] = [
        VitalSign::HeartRate,
        VitalSign::RespiratoryRate,
        VitalSign::SystolicBp,
        VitalSign::DiastolicBp,
        VitalSign::Spo2,
        VitalSign::Temperature,
        VitalSign::GcsScore,
        VitalSign::PainScale,
        VitalSign::Glucose,
        VitalSign::UrineOutput,
    ];

    /// Stable string key for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalSign::HeartRate => "heart_rate",
            VitalSign::RespiratoryRate => "respiratory_rate",
            VitalSign::SystolicBp => "systolic_bp",
            VitalSign::DiastolicBp => "diastolic_bp",
            VitalSign::Spo2 => "spo2",
            VitalSign::Temperature => "temperature",
            VitalSign::GcsScore => "gcs_score",
            VitalSign::PainScale => "pain_scale",
            VitalSign::Glucose => "glucose",
            VitalSign::UrineOutput => "urine_output",
        }
    }
}

impl fmt::Display for VitalSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalSign {
    type Err = UnknownVitalSign;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VitalSign::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownVitalSign(s.to_string()))
    }
}
