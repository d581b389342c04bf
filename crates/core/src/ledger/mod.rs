//! Double-entry bookkeeping logic.
//!
//! - Chart of accounts types and classification
//! - Journal entry drafts and persisted records
//! - Business rule validation producing [`BalancedEntry`]

pub mod account;
pub mod entry;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::{AccountClassification, LedgerAccount, NewLedgerAccount};
pub use entry::{
    EntryReference, EntrySide, JournalEntryDraft, JournalEntryRecord, JournalEntryStatus,
    JournalLineDraft,
};
pub use validation::{BalancedEntry, LedgerValidationError, validate_entry};
