//! Journal entry and contract numbering.
//!
//! Numbers come from atomic per-tenant counters, never from counting rows.
//! Callers still treat a unique violation on insert as a collision and ask
//! for the next value.

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use fleetledger_shared::types::TenantId;

use super::store::{SequenceStore, StoreResult};

/// Sequence scope for contract numbers.
pub const CONTRACT_SEQUENCE_SCOPE: &str = "contract";

/// Returns the per-day sequence scope for entry numbers.
#[must_use]
pub fn entry_sequence_scope(date: NaiveDate) -> String {
    format!("journal_entry:{}", date.format("%Y%m%d"))
}

/// Formats `PREFIX-YYYYMMDD-NNNN`.
#[must_use]
pub fn format_entry_number(prefix: &str, date: NaiveDate, seq: i64) -> String {
    format!("{prefix}-{}-{seq:04}", date.format("%Y%m%d"))
}

/// Formats `PREFIX-YY-NNNN`.
#[must_use]
pub fn format_contract_number(prefix: &str, date: NaiveDate, seq: i64) -> String {
    format!("{prefix}-{:02}-{seq:04}", date.year().rem_euclid(100))
}

/// Generates entry and contract numbers for a tenant.
pub struct JournalEntryNumberer<'a, S: ?Sized> {
    store: &'a S,
    entry_prefix: &'a str,
    contract_prefix: &'a str,
}

impl<'a, S: SequenceStore + ?Sized> JournalEntryNumberer<'a, S> {
    /// Creates a numberer with the given prefixes.
    #[must_use]
    pub const fn new(store: &'a S, entry_prefix: &'a str, contract_prefix: &'a str) -> Self {
        Self {
            store,
            entry_prefix,
            contract_prefix,
        }
    }

    /// Returns the next entry number for `date`.
    ///
    /// # Errors
    ///
    /// Propagates sequence store failures.
    pub async fn next_entry_number(&self, tenant_id: TenantId, date: NaiveDate) -> StoreResult<String> {
        let seq = self
            .store
            .next_sequence_value(tenant_id, &entry_sequence_scope(date))
            .await?;
        let number = format_entry_number(self.entry_prefix, date, seq);
        debug!(tenant_id = %tenant_id, entry_number = %number, "Allocated entry number");
        Ok(number)
    }

    /// Returns the next contract number, using the year of `date`.
    ///
    /// # Errors
    ///
    /// Propagates sequence store failures.
    pub async fn next_contract_number(&self, tenant_id: TenantId, date: NaiveDate) -> StoreResult<String> {
        let seq = self
            .store
            .next_sequence_value(tenant_id, CONTRACT_SEQUENCE_SCOPE)
            .await?;
        let number = format_contract_number(self.contract_prefix, date, seq);
        debug!(tenant_id = %tenant_id, contract_number = %number, "Allocated contract number");
        Ok(number)
    }
}
