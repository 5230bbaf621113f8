//! Amendment Ledger
//!
//! Append-only audit trail for clinical reading records. Every creation
//! and revision lands here as a field-level diff; revisions require a
//! stated reason. Entries are never mutated or deleted.

mod ledger;
mod record;

pub use ledger::{Ledger, LedgerError};
pub use record::{diff, AmendmentAction, AmendmentRecord, FieldChange};
