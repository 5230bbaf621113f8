//! Candidate Alert Synthesis

use crate::alert::{Alert, AlertCategory, AlertPayload};
use crate::identity;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use threshold_eval::ThresholdSet;
use tracing::debug;
use ward_model::{BedOccupancy, CriticalPatient};

/// Synthesizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Occupied fraction above which the facility alert fires (default: 0.80)
    pub occupancy_alert_ratio: f64,
    /// Free-bed count at or below which the availability alert fires (default: 2)
    pub low_availability_beds: u32,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            occupancy_alert_ratio: 0.80,
            low_availability_beds: 2,
        }
    }
}

/// Produces candidate alerts from a source-data snapshot.
///
/// Stateless apart from configuration; identities are derived entirely from
/// the snapshot and `now_ms`, so re-evaluating unchanged data yields
/// identical candidates. Output order is not significant.
pub struct Synthesizer {
    config: SynthesizerConfig,
}

impl Synthesizer {
    /// Create a synthesizer with the given config
    pub fn new(config: SynthesizerConfig) -> Self {
        Self { config }
    }

    /// Synthesize candidate alerts for one refresh cycle
    pub fn synthesize(
        &self,
        thresholds: &ThresholdSet,
        patients: &[CriticalPatient],
        occupancy: &BedOccupancy,
        now_ms: i64,
    ) -> Vec<Alert> {
        let mut candidates = Vec::new();
        let generated_at = Utc::now();

        for patient in patients {
            let violations = thresholds.violations(&patient.latest_reading);
            if violations.is_empty() {
                continue;
            }

            let fields: Vec<String> = violations
                .iter()
                .map(|v| format!("{} {} (normal {})", v.label, v.value, v.normal_range))
                .collect();
            let message = format!(
                "{} (bed {}): {}",
                patient.patient_name,
                patient.bed_number,
                fields.join(", ")
            );

            candidates.push(Alert {
                identity: identity::critical_identity(
                    &patient.patient_id,
                    patient.latest_reading.recorded_at_ms(),
                ),
                category: AlertCategory::PatientCritical,
                severity: AlertCategory::PatientCritical.severity(),
                payload: AlertPayload::PatientCritical {
                    patient_id: patient.patient_id.clone(),
                    patient_name: patient.patient_name.clone(),
                    bed_number: patient.bed_number.clone(),
                    violations,
                },
                message,
                generated_at,
            });
        }

        let ratio = occupancy.occupancy_ratio();
        if ratio > self.config.occupancy_alert_ratio {
            candidates.push(Alert {
                identity: identity::high_occupancy_identity(now_ms),
                category: AlertCategory::CapacityHigh,
                severity: AlertCategory::CapacityHigh.severity(),
                payload: AlertPayload::CapacityHigh {
                    total_beds: occupancy.total_beds,
                    occupied_beds: occupancy.occupied_beds,
                    occupancy_ratio: ratio,
                },
                message: format!(
                    "Ward occupancy at {:.0}% ({} of {} beds)",
                    ratio * 100.0,
                    occupancy.occupied_beds,
                    occupancy.total_beds
                ),
                generated_at,
            });
        }

        let available = occupancy.available_beds();
        if available <= self.config.low_availability_beds {
            candidates.push(Alert {
                identity: identity::low_availability_identity(available, now_ms),
                category: AlertCategory::CapacityLow,
                severity: AlertCategory::CapacityLow.severity(),
                payload: AlertPayload::CapacityLow { available_beds: available },
                message: format!("Only {} bed(s) available", available),
                generated_at,
            });
        }

        debug!(count = candidates.len(), "synthesized candidate alerts");
        candidates
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(SynthesizerConfig::default())
    }
}
