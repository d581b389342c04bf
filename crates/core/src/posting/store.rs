//! Persistence ports for contract revenue posting.
//!
//! The core crate stays free of database dependencies; `fleetledger-db`
//! implements these traits over PostgreSQL.

use serde_json::Value;
use thiserror::Error;
use fleetledger_shared::types::{AccountId, ContractId, CostCenterId, TenantId};

use super::contract::{ContractRecord, NewContract};
use super::roles::AccountRole;
use crate::ledger::{AccountClassification, BalancedEntry, JournalEntryRecord, LedgerAccount, NewLedgerAccount};

/// Errors reported by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Constraint or column set that was violated.
        constraint: String,
    },

    /// A row the write depends on does not exist or is in the wrong state.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// The store answered with something that could not be interpreted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl StoreError {
    /// Returns true for unique constraint violations.
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Chart of accounts, role mappings and cost centers.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns the account behind the tenant's active mapping for `role`.
    async fn find_mapped_account(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> StoreResult<Option<LedgerAccount>>;

    /// Returns the oldest active non-header account of a classification.
    ///
    /// Ties on `created_at` are broken by code, then id.
    async fn find_reusable_account(
        &self,
        tenant_id: TenantId,
        classification: AccountClassification,
    ) -> StoreResult<Option<LedgerAccount>>;

    /// Inserts an account; a duplicate `(tenant_id, code)` is a unique violation.
    async fn insert_account(&self, account: NewLedgerAccount) -> StoreResult<LedgerAccount>;

    /// Makes `account_id` the single active mapping for `(tenant_id, role)`.
    ///
    /// Any previous active mapping is superseded atomically.
    async fn upsert_role_mapping(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
        account_id: AccountId,
    ) -> StoreResult<()>;

    /// Returns an active cost center by code.
    async fn find_active_cost_center(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> StoreResult<Option<CostCenterId>>;
}

/// Atomic per-tenant counters.
#[async_trait::async_trait]
pub trait SequenceStore: Send + Sync {
    /// Increments and returns the counter for `(tenant_id, scope)`, starting at 1.
    async fn next_sequence_value(&self, tenant_id: TenantId, scope: &str) -> StoreResult<i64>;
}

/// Contract rows.
#[async_trait::async_trait]
pub trait ContractStore: Send + Sync {
    /// Inserts a draft contract; a duplicate contract number is a unique violation.
    async fn insert_contract(&self, contract: NewContract) -> StoreResult<ContractRecord>;

    /// Marks a draft contract as needing a manual revenue entry.
    async fn flag_manual_entry(
        &self,
        tenant_id: TenantId,
        contract_id: ContractId,
        reason: &str,
    ) -> StoreResult<()>;
}

/// Journal persistence.
#[async_trait::async_trait]
pub trait JournalStore: Send + Sync {
    /// Persists the entry header and lines, links the entry to the contract
    /// and activates the contract, all in one transaction.
    ///
    /// Fails with [`StoreError::NotFound`] when the contract is not an
    /// unposted draft, and with a unique violation when `entry_number` is taken.
    /// Nothing is written on failure.
    async fn commit_contract_entry(
        &self,
        entry: &BalancedEntry,
        entry_number: &str,
        contract_id: ContractId,
    ) -> StoreResult<JournalEntryRecord>;
}

/// Everything the posting pipeline needs from persistence.
pub trait PostingStore: AccountStore + SequenceStore + ContractStore + JournalStore {}

impl<T> PostingStore for T where T: AccountStore + SequenceStore + ContractStore + JournalStore {}

/// The database-side atomic contract-plus-entry function.
///
/// The response is untrusted JSON and is parsed by
/// [`super::fallback::ProcedureResponse`].
#[async_trait::async_trait]
pub trait ContractProcedure: Send + Sync {
    /// Creates the contract and its revenue entry in one call.
    async fn create_contract_with_journal_entry(&self, payload: Value) -> StoreResult<Value>;
}
