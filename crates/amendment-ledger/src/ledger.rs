//! Ledger Implementation

use crate::record::{diff, AmendmentAction, AmendmentRecord};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;
use ward_model::VitalSign;

/// Errors raised while appending to the ledger
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// UPDATE entries must state why the record was revised
    #[error("amendment reason must not be empty for an update")]
    MissingReason,

    /// UPDATE with values identical to the current record
    #[error("no field values changed; nothing to amend")]
    NoChanges,

    /// Internal lock failure
    #[error("ledger lock error: {0}")]
    LockError(String),
}

/// Append-only amendment ledger (in-memory).
///
/// Entries per target record are held in append order, which is also
/// chronological order; there is no API to mutate or remove them.
pub struct Ledger {
    entries: Mutex<HashMap<Uuid, Vec<AmendmentRecord>>>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record the creation of a reading. `previous` is empty by
    /// definition; a reason is optional.
    pub fn append_create(
        &self,
        target_record_id: Uuid,
        values: &BTreeMap<VitalSign, f64>,
        reason: Option<String>,
        actor: &str,
        abnormal_confirmed: bool,
    ) -> Result<AmendmentRecord, LedgerError> {
        let changes = diff(&BTreeMap::new(), values);
        let record = AmendmentRecord {
            target_record_id,
            action: AmendmentAction::Create,
            changes,
            reason,
            actor: actor.to_string(),
            recorded_at: Utc::now(),
            abnormal_confirmed,
        };
        self.push(record)
    }

    /// Record a revision of a reading. Fails when `reason` is empty or
    /// whitespace, or when nothing actually changed.
    pub fn append_update(
        &self,
        target_record_id: Uuid,
        previous: &BTreeMap<VitalSign, f64>,
        new: &BTreeMap<VitalSign, f64>,
        reason: &str,
        actor: &str,
        abnormal_confirmed: bool,
    ) -> Result<AmendmentRecord, LedgerError> {
        if reason.trim().is_empty() {
            return Err(LedgerError::MissingReason);
        }

        let changes = diff(previous, new);
        if changes.is_empty() {
            return Err(LedgerError::NoChanges);
        }

        let record = AmendmentRecord {
            target_record_id,
            action: AmendmentAction::Update,
            changes,
            reason: Some(reason.trim().to_string()),
            actor: actor.to_string(),
            recorded_at: Utc::now(),
            abnormal_confirmed,
        };
        self.push(record)
    }

    fn push(&self, record: AmendmentRecord) -> Result<AmendmentRecord, LedgerError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| LedgerError::LockError(e.to_string()))?;

        info!(
            target = %record.target_record_id,
            action = ?record.action,
            fields = record.changes.len(),
            "ledger entry appended"
        );
        entries
            .entry(record.target_record_id)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    /// All entries for one record, oldest first
    pub fn history_for(&self, target_record_id: Uuid) -> Vec<AmendmentRecord> {
        self.entries
            .lock()
            .map(|entries| entries.get(&target_record_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Total number of ledger entries across all records
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Whether the ledger holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Ledger {
    fn default() -> Self {
        debug!("creating empty amendment ledger");
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldChange;

    fn values(heart_rate: f64) -> BTreeMap<VitalSign, f64> {
        let mut map = BTreeMap::new();
        map.insert(VitalSign::HeartRate, heart_rate);
        map
    }

    #[test]
    fn test_create_needs_no_reason() {
        let ledger = Ledger::new();
        let id = Uuid::new_v4();
        let record = ledger
            .append_create(id, &values(80.0), None, "nurse-7", false)
            .unwrap();

        assert_eq!(record.action, AmendmentAction::Create);
        assert!(record.reason.is_none());
        assert_eq!(
            record.changes[&VitalSign::HeartRate],
            FieldChange { old: None, new: Some(80.0) }
        );
    }

    #[test]
    fn test_update_empty_reason_fails() {
        let ledger = Ledger::new();
        let id = Uuid::new_v4();

        let err = ledger
            .append_update(id, &values(80.0), &values(130.0), "", "nurse-7", true)
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingReason));

        let err = ledger
            .append_update(id, &values(80.0), &values(130.0), "   \t", "nurse-7", true)
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingReason));

        // Nothing was written
        assert!(ledger.history_for(id).is_empty());
    }

    #[test]
    fn test_update_diff_contains_only_changed_field() {
        let ledger = Ledger::new();
        let id = Uuid::new_v4();

        let mut previous = values(80.0);
        previous.insert(VitalSign::Spo2, 97.0);
        let mut new = values(130.0);
        new.insert(VitalSign::Spo2, 97.0);

        let record = ledger
            .append_update(id, &previous, &new, "transcription error", "nurse-7", true)
            .unwrap();

        assert_eq!(record.action, AmendmentAction::Update);
        assert_eq!(record.changes.len(), 1);
        assert!(record.changes.contains_key(&VitalSign::HeartRate));
        assert_eq!(record.reason.as_deref(), Some("transcription error"));
    }

    #[test]
    fn test_update_without_changes_fails() {
        let ledger = Ledger::new();
        let id = Uuid::new_v4();
        let err = ledger
            .append_update(id, &values(80.0), &values(80.0), "no-op", "nurse-7", false)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NoChanges));
    }

    #[test]
    fn test_history_oldest_first() {
        let ledger = Ledger::new();
        let id = Uuid::new_v4();

        ledger.append_create(id, &values(80.0), None, "nurse-7", false).unwrap();
        ledger
            .append_update(id, &values(80.0), &values(130.0), "late entry", "dr-a", true)
            .unwrap();
        ledger
            .append_update(id, &values(130.0), &values(90.0), "corrected", "dr-a", false)
            .unwrap();

        let history = ledger.history_for(id);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].action, AmendmentAction::Create);
        assert_eq!(history[1].action, AmendmentAction::Update);
        assert!(history[0].recorded_at <= history[1].recorded_at);
        assert!(history[1].recorded_at <= history[2].recorded_at);
    }

    #[test]
    fn test_histories_are_per_record() {
        let ledger = Ledger::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        ledger.append_create(a, &values(80.0), None, "nurse-7", false).unwrap();

        assert_eq!(ledger.history_for(a).len(), 1);
        assert!(ledger.history_for(b).is_empty());
        assert_eq!(ledger.len(), 1);
    }
}
