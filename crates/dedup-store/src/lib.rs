//! Alert Deduplication Store
//!
//! Tracks acknowledged alert identities and filters candidate alerts down
//! to the set an operator has not yet seen. Retention windows are computed
//! from the timestamp or bucket embedded in each identity, so suppression
//! tracks the underlying event rather than the acknowledgement click.

mod store;

pub use store::{AckOutcome, AckStore, AcknowledgedEntry, RetentionPolicy};
