//! Engine Error Types

use crate::source::FetchError;
use amendment_ledger::LedgerError;
use thiserror::Error;
use threshold_eval::ThresholdError;
use uuid::Uuid;

/// Errors surfaced by engine operations.
///
/// Nothing here is fatal to the host: fetch failures degrade to serving
/// the previous alert set, validation failures reject one write.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A refresh cycle's source pull failed; retried on the next tick
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Fetched threshold configuration was malformed
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    /// A ledger write was rejected
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The reading to amend does not exist
    #[error("reading not found: {0}")]
    ReadingNotFound(Uuid),

    /// Out-of-range values were written without explicit confirmation
    #[error("out-of-range values require confirmation: {}", fields.join(", "))]
    ConfirmationRequired { fields: Vec<String> },

    /// Internal lock failure
    #[error("engine lock error: {0}")]
    Internal(String),
}
