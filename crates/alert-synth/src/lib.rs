//! Alert Synthesis
//!
//! Turns a snapshot of critical patients and bed occupancy into candidate
//! alerts with deterministic identities. Identities embed the clinical
//! timestamp or time bucket that produced them, so the dedup store can
//! recover the underlying event time without extra bookkeeping.

mod alert;
mod identity;
mod synthesizer;

pub use alert::{Alert, AlertCategory, AlertPayload, Severity};
pub use identity::{
    bucket_index, critical_identity, high_occupancy_identity, low_availability_identity,
    ParsedIdentity, BUCKET_WIDTH_MS,
};
pub use synthesizer::{Synthesizer, SynthesizerConfig};
