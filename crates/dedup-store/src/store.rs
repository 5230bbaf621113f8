//! Acknowledgement Store Implementation

use alert_synth::{bucket_index, Alert, AlertCategory, ParsedIdentity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Retention windows for acknowledged identities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// How long a patient-critical acknowledgement holds, measured from the
    /// reading timestamp embedded in the identity (default: 1 hour)
    pub critical_retention_ms: i64,
    /// How many whole buckets before the current one a capacity
    /// acknowledgement survives (default: 1, i.e. current plus previous)
    pub capacity_bucket_grace: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            critical_retention_ms: 3_600_000,
            capacity_bucket_grace: 1,
        }
    }
}

/// One acknowledged alert identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgedEntry {
    pub identity: String,
    /// `None` marks an identity whose shape was not recognized; such
    /// entries are retained unconditionally (fail open)
    pub category: Option<AlertCategory>,
    pub acknowledged_at_ms: i64,
    pub acknowledged_by: String,
}

/// Outcome of an acknowledge call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// A new entry was recorded
    Recorded,
    /// The identity was already acknowledged; the call was a no-op
    AlreadyAcknowledged,
}

/// Keyed store of acknowledged alert identities.
///
/// Not thread safe on its own; callers serialize access behind a mutex.
pub struct AckStore {
    entries: HashMap<String, AcknowledgedEntry>,
    policy: RetentionPolicy,
}

impl AckStore {
    /// Create a store with the given retention policy
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    /// Record an acknowledgement. Idempotent: acknowledging an identity
    /// twice leaves the store unchanged and reports `AlreadyAcknowledged`.
    pub fn acknowledge(&mut self, identity: &str, actor: &str, now_ms: i64) -> AckOutcome {
        if self.entries.contains_key(identity) {
            debug!(identity, "identity already acknowledged");
            return AckOutcome::AlreadyAcknowledged;
        }

        let category = match ParsedIdentity::parse(identity) {
            Some(parsed) => Some(parsed.category()),
            None => {
                warn!(identity, "unrecognized identity format; entry will never expire");
                None
            }
        };

        self.entries.insert(
            identity.to_string(),
            AcknowledgedEntry {
                identity: identity.to_string(),
                category,
                acknowledged_at_ms: now_ms,
                acknowledged_by: actor.to_string(),
            },
        );
        info!(identity, actor, "alert acknowledged");
        AckOutcome::Recorded
    }

    /// Whether an identity is currently acknowledged
    pub fn is_acknowledged(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Remove entries whose retention window has elapsed.
    ///
    /// Patient-critical entries expire a fixed interval after the reading
    /// timestamp embedded in their identity. Capacity entries expire once
    /// their bucket falls behind the current one by more than the grace.
    /// Entries with an unrecognized shape are never removed.
    pub fn evict_expired(&mut self, now_ms: i64) {
        let policy = &self.policy;
        let current_bucket = bucket_index(now_ms);
        let before = self.entries.len();

        self.entries.retain(|identity, _| {
            let Some(parsed) = ParsedIdentity::parse(identity) else {
                return true;
            };
            match parsed {
                ParsedIdentity::Critical { recorded_at_ms, .. } => {
                    now_ms - recorded_at_ms <= policy.critical_retention_ms
                }
                ParsedIdentity::HighOccupancy { bucket }
                | ParsedIdentity::LowAvailability { bucket, .. } => {
                    current_bucket - bucket <= policy.capacity_bucket_grace
                }
            }
        });

        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "evicted expired acknowledgements");
        }
    }

    /// Evict expired entries, then drop candidates whose identity has been
    /// acknowledged
    pub fn filter_active(&mut self, candidates: Vec<Alert>, now_ms: i64) -> Vec<Alert> {
        self.evict_expired(now_ms);
        candidates
            .into_iter()
            .filter(|alert| !self.entries.contains_key(&alert.identity))
            .collect()
    }

    /// Number of acknowledged identities currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all held entries
    pub fn entries(&self) -> Vec<&AcknowledgedEntry> {
        self.entries.values().collect()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AckStore {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_synth::{
        critical_identity, high_occupancy_identity, low_availability_identity, Synthesizer,
        BUCKET_WIDTH_MS,
    };
    use threshold_eval::{FieldDataType, ThresholdConfig, ThresholdSet};
    use ward_model::BedOccupancy;

    const HOUR_MS: i64 = 3_600_000;

    #[test]
    fn test_acknowledge_idempotent() {
        let mut store = AckStore::default();
        let identity = critical_identity("p-1", 1000);

        assert_eq!(store.acknowledge(&identity, "dr-a", 2000), AckOutcome::Recorded);
        assert_eq!(
            store.acknowledge(&identity, "dr-b", 3000),
            AckOutcome::AlreadyAcknowledged
        );
        assert_eq!(store.len(), 1);
        // First acknowledgement wins; second is a no-op
        let entry = store.entries()[0];
        assert_eq!(entry.acknowledged_by, "dr-a");
        assert_eq!(entry.acknowledged_at_ms, 2000);
    }

    #[test]
    fn test_critical_expiry_uses_embedded_timestamp() {
        let mut store = AckStore::default();
        let reading_ms = 1_700_000_000_000;
        let identity = critical_identity("p-1", reading_ms);

        // Acknowledged 50 minutes after the reading was taken
        store.acknowledge(&identity, "dr-a", reading_ms + 50 * 60 * 1000);

        // 55 minutes after the reading: still held
        store.evict_expired(reading_ms + 55 * 60 * 1000);
        assert!(store.is_acknowledged(&identity));

        // 61 minutes after the reading: evicted, even though the click was
        // only 11 minutes ago
        store.evict_expired(reading_ms + 61 * 60 * 1000);
        assert!(!store.is_acknowledged(&identity));
    }

    #[test]
    fn test_capacity_retained_through_previous_bucket() {
        let mut store = AckStore::default();
        let t = 1_700_000_000_000 / BUCKET_WIDTH_MS * BUCKET_WIDTH_MS;
        let identity = high_occupancy_identity(t);
        store.acknowledge(&identity, "charge-nurse", t);

        // Same bucket
        store.evict_expired(t + 5 * 60 * 1000);
        assert!(store.is_acknowledged(&identity));

        // Next bucket: still within grace
        store.evict_expired(t + BUCKET_WIDTH_MS + 1000);
        assert!(store.is_acknowledged(&identity));

        // Two buckets on: evicted
        store.evict_expired(t + 2 * BUCKET_WIDTH_MS + 1000);
        assert!(!store.is_acknowledged(&identity));
    }

    #[test]
    fn test_low_availability_expiry() {
        let mut store = AckStore::default();
        let t = 1_700_000_000_000;
        let identity = low_availability_identity(2, t);
        store.acknowledge(&identity, "charge-nurse", t);

        store.evict_expired(t + 3 * BUCKET_WIDTH_MS);
        assert!(!store.is_acknowledged(&identity));
    }

    #[test]
    fn test_unrecognized_identity_never_evicted() {
        let mut store = AckStore::default();
        store.acknowledge("legacy-alert-format-17", "dr-a", 0);

        store.evict_expired(i64::MAX - HOUR_MS);
        assert!(store.is_acknowledged("legacy-alert-format-17"));
        let entry = store.entries()[0];
        assert!(entry.category.is_none());
    }

    #[test]
    fn test_filter_active_drops_acknowledged() {
        let synth = Synthesizer::default();
        let thresholds = ThresholdSet::new(vec![ThresholdConfig {
            name: "heart_rate".to_string(),
            label: "Heart Rate".to_string(),
            unit: "bpm".to_string(),
            normal_min: Some(60.0),
            normal_max: Some(100.0),
            data_type: FieldDataType::Integer,
            is_active: true,
            display_order: 1,
        }])
        .unwrap();

        let now_ms = 1_700_000_000_000;
        // 85% occupied with three beds free: only the high-occupancy rule fires
        let occupancy = BedOccupancy { total_beds: 20, occupied_beds: 17 };
        let candidates = synth.synthesize(&thresholds, &[], &occupancy, now_ms);
        assert_eq!(candidates.len(), 1);
        let identity = candidates[0].identity.clone();

        let mut store = AckStore::default();
        let active = store.filter_active(candidates.clone(), now_ms);
        assert_eq!(active.len(), 1);

        store.acknowledge(&identity, "charge-nurse", now_ms);
        let active = store.filter_active(candidates.clone(), now_ms);
        assert!(active.is_empty());

        // Still suppressed at the end of the grace window
        let later = synth.synthesize(&thresholds, &[], &occupancy, now_ms + 25 * 60 * 1000);
        // A new bucket means a new identity, so suppression is identity-based
        if later[0].identity == identity {
            assert!(store.filter_active(later, now_ms + 25 * 60 * 1000).is_empty());
        }

        // Once the acknowledged bucket is more than one interval stale the
        // entry is gone and a same-shaped alert would need re-acknowledging
        store.evict_expired(now_ms + 2 * BUCKET_WIDTH_MS + 1000);
        assert!(store.is_empty());
    }
}
