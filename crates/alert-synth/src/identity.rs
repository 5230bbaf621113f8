//! Deterministic Alert Identities
//!
//! Identity strings encode the clinical timestamp (patient alerts) or the
//! 15-minute wall-clock bucket (capacity alerts) that produced them. The
//! dedup store parses these back out to compute retention windows, so the
//! formats here are a stable contract.

use crate::alert::AlertCategory;

/// Width of the capacity-alert rate-limiting bucket: 15 minutes
pub const BUCKET_WIDTH_MS: i64 = 900_000;

const CRITICAL_PREFIX: &str = "critical:";
const HIGH_OCCUPANCY_PREFIX: &str = "high-occupancy:";
const LOW_AVAILABILITY_PREFIX: &str = "low-availability:";

/// Bucket index for a millisecond wall-clock timestamp
pub fn bucket_index(now_ms: i64) -> i64 {
    now_ms.div_euclid(BUCKET_WIDTH_MS)
}

/// The components recovered from a well-formed identity string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIdentity {
    /// `critical:{patient_id}:{epoch_millis}`
    Critical { patient_id: String, recorded_at_ms: i64 },
    /// `high-occupancy:{bucket}`
    HighOccupancy { bucket: i64 },
    /// `low-availability:{available_beds}:{bucket}`
    LowAvailability { available_beds: u32, bucket: i64 },
}

impl ParsedIdentity {
    /// Parse an identity string; `None` when the shape is unrecognized
    pub fn parse(identity: &str) -> Option<Self> {
        if let Some(rest) = identity.strip_prefix(CRITICAL_PREFIX) {
            // Patient ids may themselves contain colons; the timestamp is
            // always the final segment.
            let (patient_id, ms) = rest.rsplit_once(':')?;
            if patient_id.is_empty() {
                return None;
            }
            return Some(ParsedIdentity::Critical {
                patient_id: patient_id.to_string(),
                recorded_at_ms: ms.parse().ok()?,
            });
        }
        if let Some(rest) = identity.strip_prefix(HIGH_OCCUPANCY_PREFIX) {
            return Some(ParsedIdentity::HighOccupancy { bucket: rest.parse().ok()? });
        }
        if let Some(rest) = identity.strip_prefix(LOW_AVAILABILITY_PREFIX) {
            let (available, bucket) = rest.split_once(':')?;
            return Some(ParsedIdentity::LowAvailability {
                available_beds: available.parse().ok()?,
                bucket: bucket.parse().ok()?,
            });
        }
        None
    }

    /// Category this identity belongs to
    pub fn category(&self) -> AlertCategory {
        match self {
            ParsedIdentity::Critical { .. } => AlertCategory::PatientCritical,
            ParsedIdentity::HighOccupancy { .. } => AlertCategory::CapacityHigh,
            ParsedIdentity::LowAvailability { .. } => AlertCategory::CapacityLow,
        }
    }
}

/// Identity for a per-patient critical alert; changes whenever a new
/// reading is recorded, even if still abnormal
pub fn critical_identity(patient_id: &str, recorded_at_ms: i64) -> String {
    format!("{CRITICAL_PREFIX}{patient_id}:{recorded_at_ms}")
}

/// Identity for the facility high-occupancy alert; one per 15-minute bucket
pub fn high_occupancy_identity(now_ms: i64) -> String {
    format!("{HIGH_OCCUPANCY_PREFIX}{}", bucket_index(now_ms))
}

/// Identity for the low-availability alert; keyed by the exact free-bed
/// count so a change in count re-alerts within the same bucket
pub fn low_availability_identity(available_beds: u32, now_ms: i64) -> String {
    format!("{LOW_AVAILABILITY_PREFIX}{available_beds}:{}", bucket_index(now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_round_trip() {
        let identity = critical_identity("p-42", 1_700_000_000_000);
        assert_eq!(
            ParsedIdentity::parse(&identity),
            Some(ParsedIdentity::Critical {
                patient_id: "p-42".to_string(),
                recorded_at_ms: 1_700_000_000_000,
            })
        );
    }

    #[test]
    fn test_patient_id_with_colon() {
        let identity = critical_identity("ward:3:bed:7", 1000);
        assert_eq!(
            ParsedIdentity::parse(&identity),
            Some(ParsedIdentity::Critical {
                patient_id: "ward:3:bed:7".to_string(),
                recorded_at_ms: 1000,
            })
        );
    }

    #[test]
    fn test_capacity_round_trips() {
        let now_ms = 1_700_000_123_456;
        assert_eq!(
            ParsedIdentity::parse(&high_occupancy_identity(now_ms)),
            Some(ParsedIdentity::HighOccupancy { bucket: bucket_index(now_ms) })
        );
        assert_eq!(
            ParsedIdentity::parse(&low_availability_identity(2, now_ms)),
            Some(ParsedIdentity::LowAvailability {
                available_beds: 2,
                bucket: bucket_index(now_ms),
            })
        );
    }

    #[test]
    fn test_bucket_rollover() {
        let t = 1_700_000_000_000;
        let five_min = 5 * 60 * 1000;
        let sixteen_min = 16 * 60 * 1000;
        // Aligned so t is at the start of a bucket
        let t = bucket_index(t) * BUCKET_WIDTH_MS;

        assert_eq!(bucket_index(t), bucket_index(t + five_min));
        assert_ne!(bucket_index(t), bucket_index(t + sixteen_min));
        assert_ne!(high_occupancy_identity(t), high_occupancy_identity(t + sixteen_min));
        assert_eq!(high_occupancy_identity(t), high_occupancy_identity(t + five_min));
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert_eq!(ParsedIdentity::parse("some-legacy-alert"), None);
        assert_eq!(ParsedIdentity::parse("critical:p-1:not-a-number"), None);
        assert_eq!(ParsedIdentity::parse("critical:12345"), None);
        assert_eq!(ParsedIdentity::parse("high-occupancy:"), None);
        assert_eq!(ParsedIdentity::parse("low-availability:2"), None);
    }
}
