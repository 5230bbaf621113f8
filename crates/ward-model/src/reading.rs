//! Clinical Reading Records

use crate::VitalSign;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One measurement snapshot for a patient.
///
/// Edits to an existing record go through the amendment ledger rather than
/// silent overwrite; `is_amended` and `amendment_reason` reflect the most
/// recent revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Record id
    pub id: Uuid,
    /// Patient this reading belongs to
    pub patient_id: String,
    /// Measured values by vital-sign field
    pub values: BTreeMap<VitalSign, f64>,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
    /// Clinical actor who recorded it
    pub recorded_by: String,
    /// Whether this record has been revised after creation
    pub is_amended: bool,
    /// Reason given for the most recent amendment
    pub amendment_reason: Option<String>,
}

impl Reading {
    /// Create a new unamended reading recorded now
    pub fn new(patient_id: impl Into<String>, values: BTreeMap<VitalSign, f64>, recorded_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.into(),
            values,
            recorded_at: Utc::now(),
            recorded_by: recorded_by.into(),
            is_amended: false,
            amendment_reason: None,
        }
    }

    /// Value of one field, if measured
    pub fn value(&self, field: VitalSign) -> Option<f64> {
        self.values.get(&field).copied()
    }

    /// Millisecond epoch timestamp of the measurement
    pub fn recorded_at_ms(&self) -> i64 {
        self.recorded_at.timestamp_millis()
    }
}

/// A patient flagged as critical, as pulled from the source of truth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPatient {
    pub patient_id: String,
    pub patient_name: String,
    pub bed_number: String,
    /// Most recent reading on file for this patient
    pub latest_reading: Reading,
}
