//! Monitoring Engine Implementation

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::source::DataSource;
use alert_synth::{Alert, Synthesizer};
use amendment_ledger::{AmendmentRecord, Ledger};
use chrono::Utc;
use dedup_store::{AckOutcome, AckStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use threshold_eval::{Evaluation, ThresholdSet};
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;
use ward_model::{Reading, VitalSign};

/// The monitoring engine: one instance per host process, owning all
/// process-lifetime alert state.
///
/// Constructed once and shared by reference; the refresh loop and
/// operator-triggered writes interleave safely. No lock is held across an
/// await point.
pub struct MonitorEngine {
    config: EngineConfig,
    source: Arc<dyn DataSource>,
    synthesizer: Synthesizer,
    store: Mutex<AckStore>,
    ledger: Ledger,
    thresholds: RwLock<ThresholdSet>,
    readings: Mutex<HashMap<Uuid, Reading>>,
    active: RwLock<Vec<Alert>>,
    running: AtomicBool,
}

impl MonitorEngine {
    /// Create an engine over the given data source
    pub fn new(config: EngineConfig, source: Arc<dyn DataSource>) -> Self {
        info!(
            interval_secs = config.refresh_interval_secs,
            "creating monitoring engine"
        );
        let synthesizer = Synthesizer::new(config.synthesizer.clone());
        let store = AckStore::new(config.retention.clone());
        Self {
            config,
            source,
            synthesizer,
            store: Mutex::new(store),
            ledger: Ledger::new(),
            thresholds: RwLock::new(ThresholdSet::empty()),
            readings: Mutex::new(HashMap::new()),
            active: RwLock::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Run one refresh cycle: pull source data, synthesize candidates,
    /// filter through the dedup store, republish the active set.
    ///
    /// On any failure the previous active set is left untouched and the
    /// error is returned for the caller (usually the loop) to log.
    pub fn refresh(&self) -> Result<usize, EngineError> {
        let patients = self.source.fetch_critical_patients()?;
        let occupancy = self.source.fetch_bed_occupancy()?;
        let configs = self.source.fetch_threshold_config()?;
        let thresholds = ThresholdSet::new(configs)?;

        let now_ms = Utc::now().timestamp_millis();
        let candidates = self.synthesizer.synthesize(&thresholds, &patients, &occupancy, now_ms);

        let active = {
            let mut store = self.lock_store()?;
            store.filter_active(candidates, now_ms)
        };

        let count = active.len();
        *self
            .thresholds
            .write()
            .map_err(|e| EngineError::Internal(e.to_string()))? = thresholds;
        *self
            .active
            .write()
            .map_err(|e| EngineError::Internal(e.to_string()))? = active;

        debug!(active = count, "published active alert set");
        Ok(count)
    }

    /// Drive the periodic refresh loop until `stop` is called
    pub async fn run(&self) {
        info!(
            interval_secs = self.config.refresh_interval_secs,
            "starting refresh loop"
        );
        self.running.store(true, Ordering::SeqCst);
        let mut ticker = interval(Duration::from_secs(self.config.refresh_interval_secs));

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            match self.refresh() {
                Ok(count) => debug!(active = count, "refresh cycle complete"),
                Err(e) => warn!(error = %e, "refresh cycle failed; serving previous alert set"),
            }
        }
        info!("refresh loop stopped");
    }

    /// Stop the refresh loop after its current cycle
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the refresh loop is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The most recently published active alerts
    pub fn get_active_alerts(&self) -> Vec<Alert> {
        self.active.read().map(|a| a.clone()).unwrap_or_default()
    }

    /// Acknowledge an alert identity. Idempotent; acknowledging an
    /// identity the engine never surfaced still records the entry.
    pub fn acknowledge(&self, identity: &str, actor: &str) -> Result<AckOutcome, EngineError> {
        let now_ms = Utc::now().timestamp_millis();
        let outcome = {
            let mut store = self.lock_store()?;
            store.acknowledge(identity, actor, now_ms)
        };

        // Drop the alert from the published set immediately rather than
        // waiting for the next cycle
        if outcome == AckOutcome::Recorded {
            if let Ok(mut active) = self.active.write() {
                active.retain(|alert| alert.identity != identity);
            }
        }
        Ok(outcome)
    }

    /// Number of acknowledged identities currently held
    pub fn acknowledged_count(&self) -> usize {
        self.store.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Evaluate one field value against the active threshold config
    pub fn evaluate_reading(&self, field: &str, value: Option<f64>) -> Evaluation {
        self.thresholds
            .read()
            .map(|t| t.evaluate(field, value))
            .unwrap_or(Evaluation {
                in_range: true,
                normal_range: "unrestricted".to_string(),
            })
    }

    /// Record a new reading for a patient.
    ///
    /// Out-of-range values require `confirm_abnormal`; the creation is
    /// logged to the amendment ledger with the confirmation flag so the
    /// event is reconstructable.
    pub fn record_reading(
        &self,
        patient_id: &str,
        values: BTreeMap<VitalSign, f64>,
        actor: &str,
        confirm_abnormal: bool,
    ) -> Result<Reading, EngineError> {
        let reading = Reading::new(patient_id, values, actor);

        let violations = self
            .thresholds
            .read()
            .map(|t| t.violations(&reading))
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        let has_abnormal = !violations.is_empty();
        if has_abnormal && !confirm_abnormal {
            return Err(EngineError::ConfirmationRequired {
                fields: violations.iter().map(|v| v.field.to_string()).collect(),
            });
        }

        self.ledger
            .append_create(reading.id, &reading.values, None, actor, has_abnormal)?;

        self.lock_readings()?.insert(reading.id, reading.clone());
        info!(patient_id, reading_id = %reading.id, "reading recorded");
        Ok(reading)
    }

    /// Revise an existing reading. Requires a non-empty reason; the prior
    /// values survive in the ledger.
    pub fn amend_reading(
        &self,
        reading_id: Uuid,
        new_values: BTreeMap<VitalSign, f64>,
        reason: &str,
        actor: &str,
        confirm_abnormal: bool,
    ) -> Result<Reading, EngineError> {
        let previous = self
            .lock_readings()?
            .get(&reading_id)
            .cloned()
            .ok_or(EngineError::ReadingNotFound(reading_id))?;

        // Gate on the changed fields only: unchanged abnormal values were
        // already confirmed when they were written
        let changed = amendment_ledger::diff(&previous.values, &new_values);
        let abnormal: Vec<String> = {
            let thresholds = self
                .thresholds
                .read()
                .map_err(|e| EngineError::Internal(e.to_string()))?;
            changed
                .iter()
                .filter_map(|(field, change)| {
                    let out = thresholds.is_out_of_range(field.as_str(), change.new);
                    out.then(|| field.to_string())
                })
                .collect()
        };
        let has_abnormal = !abnormal.is_empty();
        if has_abnormal && !confirm_abnormal {
            return Err(EngineError::ConfirmationRequired { fields: abnormal });
        }

        // Validates the reason and the diff before anything is written
        self.ledger.append_update(
            reading_id,
            &previous.values,
            &new_values,
            reason,
            actor,
            has_abnormal,
        )?;

        let mut readings = self.lock_readings()?;
        let reading = readings
            .get_mut(&reading_id)
            .ok_or(EngineError::ReadingNotFound(reading_id))?;
        reading.values = new_values;
        reading.is_amended = true;
        reading.amendment_reason = Some(reason.trim().to_string());

        info!(reading_id = %reading_id, actor, "reading amended");
        Ok(reading.clone())
    }

    /// Amendment history for one reading, oldest first
    pub fn get_history(&self, reading_id: Uuid) -> Vec<AmendmentRecord> {
        self.ledger.history_for(reading_id)
    }

    /// A recorded reading by id
    pub fn get_reading(&self, reading_id: Uuid) -> Option<Reading> {
        self.readings
            .lock()
            .ok()
            .and_then(|r| r.get(&reading_id).cloned())
    }

    fn lock_store(&self) -> Result<std::sync::MutexGuard<'_, AckStore>, EngineError> {
        self.store
            .lock()
            .map_err(|e| EngineError::Internal(e.to_string()))
    }

    fn lock_readings(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Reading>>, EngineError> {
        self.readings
            .lock()
            .map_err(|e| EngineError::Internal(e.to_string()))
    }
}
