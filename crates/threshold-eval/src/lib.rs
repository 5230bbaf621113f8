//! Threshold Evaluation
//!
//! Administrator-defined normal ranges and the single pure predicate that
//! decides whether a measured value is out of range. The same predicate
//! gates confirmation dialogs on write and renders status on read.

mod config;
mod error;
mod evaluator;

pub use config::{FieldDataType, ThresholdConfig};
pub use error::ThresholdError;
pub use evaluator::{Evaluation, FieldViolation, ThresholdSet};
