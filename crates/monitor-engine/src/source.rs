//! Source Data Interfaces
//!
//! The engine does no I/O of its own; the host pulls source data and hands
//! it over through this trait. `InMemorySource` backs the demo binary and
//! tests.

use std::sync::Mutex;
use thiserror::Error;
use threshold_eval::ThresholdConfig;
use ward_model::{BedOccupancy, CriticalPatient};

/// A source-data pull failed; the refresh loop logs it and keeps the
/// previous active-alert set until the next cycle succeeds
#[derive(Debug, Clone, Error)]
#[error("transient source fetch failure: {0}")]
pub struct FetchError(pub String);

/// Where the engine pulls its snapshot from each refresh cycle
pub trait DataSource: Send + Sync {
    /// Patients currently flagged critical, with their latest reading
    fn fetch_critical_patients(&self) -> Result<Vec<CriticalPatient>, FetchError>;
    /// Facility bed occupancy counts
    fn fetch_bed_occupancy(&self) -> Result<BedOccupancy, FetchError>;
    /// Active threshold configuration entries
    fn fetch_threshold_config(&self) -> Result<Vec<ThresholdConfig>, FetchError>;
}

#[derive(Default)]
struct SourceData {
    patients: Vec<CriticalPatient>,
    occupancy: Option<BedOccupancy>,
    thresholds: Vec<ThresholdConfig>,
    fail_next: bool,
}

/// In-memory data source for the demo binary and tests
#[derive(Default)]
pub struct InMemorySource {
    data: Mutex<SourceData>,
}

impl InMemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the critical-patient snapshot
    pub fn set_patients(&self, patients: Vec<CriticalPatient>) {
        if let Ok(mut data) = self.data.lock() {
            data.patients = patients;
        }
    }

    /// Replace the occupancy counts
    pub fn set_occupancy(&self, occupancy: BedOccupancy) {
        if let Ok(mut data) = self.data.lock() {
            data.occupancy = Some(occupancy);
        }
    }

    /// Replace the threshold configuration
    pub fn set_thresholds(&self, thresholds: Vec<ThresholdConfig>) {
        if let Ok(mut data) = self.data.lock() {
            data.thresholds = thresholds;
        }
    }

    /// Make the next fetch fail once (simulates a transient outage)
    pub fn fail_next(&self) {
        if let Ok(mut data) = self.data.lock() {
            data.fail_next = true;
        }
    }

    fn check_failure(&self) -> Result<(), FetchError> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| FetchError(format!("lock error: {}", e)))?;
        if data.fail_next {
            data.fail_next = false;
            return Err(FetchError("simulated source outage".to_string()));
        }
        Ok(())
    }
}

impl DataSource for InMemorySource {
    fn fetch_critical_patients(&self) -> Result<Vec<CriticalPatient>, FetchError> {
        self.check_failure()?;
        self.data
            .lock()
            .map(|data| data.patients.clone())
            .map_err(|e| FetchError(format!("lock error: {}", e)))
    }

    fn fetch_bed_occupancy(&self) -> Result<BedOccupancy, FetchError> {
        self.check_failure()?;
        self.data
            .lock()
            .map_err(|e| FetchError(format!("lock error: {}", e)))?
            .occupancy
            .ok_or_else(|| FetchError("no occupancy data loaded".to_string()))
    }

    fn fetch_threshold_config(&self) -> Result<Vec<ThresholdConfig>, FetchError> {
        self.check_failure()?;
        self.data
            .lock()
            .map(|data| data.thresholds.clone())
            .map_err(|e| FetchError(format!("lock error: {}", e)))
    }
}
