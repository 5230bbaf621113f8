//! Shared Domain Model
//!
//! Types consumed by every other crate in the workspace: the closed set of
//! monitored vital signs, clinical readings, critical-patient snapshots,
//! and bed occupancy counts.

mod occupancy;
mod reading;
mod vitals;

pub use occupancy::BedOccupancy;
pub use reading::{CriticalPatient, Reading};
pub use vitals::{UnknownVitalSign, VitalSign};
