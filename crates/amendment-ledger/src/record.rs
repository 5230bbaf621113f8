//! Amendment Record Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use ward_model::VitalSign;

/// What happened to the target record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AmendmentAction {
    Create,
    Update,
}

/// Before/after values for one changed field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Option<f64>,
    pub new: Option<f64>,
}

/// One ledger entry for a clinical reading record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendmentRecord {
    /// The reading record this entry describes
    pub target_record_id: Uuid,
    pub action: AmendmentAction,
    /// Field-level diff; only fields whose value actually changed
    pub changes: BTreeMap<VitalSign, FieldChange>,
    /// Mandatory for UPDATE, optional for CREATE
    pub reason: Option<String>,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
    /// Whether the actor explicitly confirmed out-of-range values on this
    /// write, so the confirmation event is reconstructable from the log
    pub abnormal_confirmed: bool,
}

/// Field-level diff between two value maps. Only fields whose value
/// actually changed appear, including fields added or removed.
pub fn diff(
    previous: &BTreeMap<VitalSign, f64>,
    new: &BTreeMap<VitalSign, f64>,
) -> BTreeMap<VitalSign, FieldChange> {
    let mut changes = BTreeMap::new();

    for (field, new_value) in new {
        let old = previous.get(field).copied();
        if old != Some(*new_value) {
            changes.insert(*field, FieldChange { old, new: Some(*new_value) });
        }
    }
    for (field, old_value) in previous {
        if !new.contains_key(field) {
            changes.insert(*field, FieldChange { old: Some(*old_value), new: None });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_only_changed_fields() {
        let mut previous = BTreeMap::new();
        previous.insert(VitalSign::HeartRate, 80.0);
        previous.insert(VitalSign::Spo2, 97.0);

        let mut new = BTreeMap::new();
        new.insert(VitalSign::HeartRate, 130.0);
        new.insert(VitalSign::Spo2, 97.0);

        let changes = diff(&previous, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[&VitalSign::HeartRate],
            FieldChange { old: Some(80.0), new: Some(130.0) }
        );
    }

    #[test]
    fn test_diff_added_and_removed_fields() {
        let mut previous = BTreeMap::new();
        previous.insert(VitalSign::Spo2, 97.0);

        let mut new = BTreeMap::new();
        new.insert(VitalSign::HeartRate, 88.0);

        let changes = diff(&previous, &new);
        assert_eq!(
            changes[&VitalSign::HeartRate],
            FieldChange { old: None, new: Some(88.0) }
        );
        assert_eq!(
            changes[&VitalSign::Spo2],
            FieldChange { old: Some(97.0), new: None }
        );
    }

    #[test]
    fn test_diff_identical_maps_is_empty() {
        let mut values = BTreeMap::new();
        values.insert(VitalSign::HeartRate, 80.0);
        assert!(diff(&values, &values.clone()).is_empty());
    }
}
