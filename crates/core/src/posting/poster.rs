//! Journal posting for contract revenue.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use fleetledger_shared::PostingConfig;
use fleetledger_shared::types::{AccountId, CostCenterId, JournalEntryId, Locale, TenantId};

use super::contract::ContractRecord;
use super::messages;
use super::numbering::JournalEntryNumberer;
use super::resolver::{AccountMappingResolver, ResolveError, ResolvedAccount};
use super::roles::{AccountRole, REVENUE_ROLE_PRIORITY};
use super::store::{PostingStore, StoreError};
use crate::ledger::{JournalEntryDraft, JournalLineDraft, LedgerValidationError, validate_entry};

/// Reference type recorded on contract revenue entries.
pub const CONTRACT_REFERENCE_TYPE: &str = "contract";

/// Why a revenue entry could not be posted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingFailure {
    /// Required account roles could not be resolved.
    #[error("No ledger account configured for roles {missing_roles:?}")]
    Configuration {
        /// Every role that failed to resolve.
        missing_roles: Vec<AccountRole>,
    },

    /// The built entry failed validation.
    #[error("Entry failed validation: {0}")]
    Unbalanced(#[from] LedgerValidationError),

    /// Every allocated entry number collided with an existing entry.
    #[error("No unique entry number after {attempts} attempts")]
    NumberingExhausted {
        /// Attempts made.
        attempts: u32,
    },

    /// Persistence failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl PostingFailure {
    /// Returns a stable code for the failure kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "MISSING_ACCOUNT_MAPPING",
            Self::Unbalanced(_) => "UNBALANCED_ENTRY",
            Self::NumberingExhausted { .. } => "ENTRY_NUMBER_EXHAUSTED",
            Self::Store(_) => "LEDGER_UNAVAILABLE",
        }
    }
}

/// A revenue entry that was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedEntry {
    /// Entry ID.
    pub entry_id: JournalEntryId,
    /// Entry number.
    pub entry_number: String,
    /// Debit and credit total.
    pub total: Decimal,
    /// Debited receivables account.
    pub receivable_account_id: AccountId,
    /// Credited revenue account.
    pub revenue_account_id: AccountId,
    /// Role the revenue account was resolved for.
    pub revenue_role: AccountRole,
    /// Cost center on both lines.
    pub cost_center_id: Option<CostCenterId>,
}

/// Result of a posting attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingOutcome {
    /// The entry was persisted and the contract activated.
    Posted(PostedEntry),
    /// Nothing to post (zero or negative amount).
    Skipped,
}

/// Builds and persists the two-line revenue entry for a contract.
pub struct JournalPoster<'a, S: ?Sized> {
    store: &'a S,
    config: &'a PostingConfig,
}

impl<'a, S: PostingStore + ?Sized> JournalPoster<'a, S> {
    /// Creates a new poster.
    #[must_use]
    pub const fn new(store: &'a S, config: &'a PostingConfig) -> Self {
        Self { store, config }
    }

    /// Posts revenue for a draft contract.
    ///
    /// Debits receivables and credits the first revenue role that resolves.
    /// The entry, its lines, the contract link and the contract activation
    /// are written in one store transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`PostingFailure`]; nothing is persisted in that case.
    pub async fn post_contract_revenue(
        &self,
        contract: &ContractRecord,
        locale: Locale,
    ) -> Result<PostingOutcome, PostingFailure> {
        let tenant_id = contract.tenant_id;
        if contract.amount <= Decimal::ZERO {
            info!(
                tenant_id = %tenant_id,
                contract_id = %contract.id,
                amount = %contract.amount,
                "Contract has no amount to post, skipping journal entry"
            );
            return Ok(PostingOutcome::Skipped);
        }

        let (receivable, revenue) = self.resolve_accounts(tenant_id).await?;
        let cost_center_id = self.find_cost_center(tenant_id).await;

        let number = &contract.contract_number;
        let draft = JournalEntryDraft::from_lines(
            tenant_id,
            contract.contract_date,
            messages::entry_description(locale, number),
            vec![
                JournalLineDraft::debit(
                    receivable.account_id,
                    contract.amount,
                    messages::receivable_line_description(locale, number),
                )
                .with_cost_center(cost_center_id),
                JournalLineDraft::credit(
                    revenue.account_id,
                    contract.amount,
                    messages::revenue_line_description(locale, number),
                )
                .with_cost_center(cost_center_id),
            ],
        )
        .with_reference(CONTRACT_REFERENCE_TYPE, contract.id.into_inner());

        let balanced = validate_entry(draft).inspect_err(|e| {
            error!(tenant_id = %tenant_id, contract_id = %contract.id, error = %e, "Built an invalid revenue entry");
        })?;

        let numberer = JournalEntryNumberer::new(
            self.store,
            &self.config.entry_prefix,
            &self.config.contract_prefix,
        );
        let attempts = self.config.max_number_attempts.max(1);
        for attempt in 1..=attempts {
            let entry_number = numberer
                .next_entry_number(tenant_id, contract.contract_date)
                .await?;
            match self
                .store
                .commit_contract_entry(&balanced, &entry_number, contract.id)
                .await
            {
                Ok(record) => {
                    info!(
                        tenant_id = %tenant_id,
                        contract_id = %contract.id,
                        entry_id = %record.id,
                        entry_number = %record.entry_number,
                        total = %record.total_debit,
                        "Posted contract revenue entry"
                    );
                    return Ok(PostingOutcome::Posted(PostedEntry {
                        entry_id: record.id,
                        entry_number: record.entry_number,
                        total: balanced.total(),
                        receivable_account_id: receivable.account_id,
                        revenue_account_id: revenue.account_id,
                        revenue_role: revenue.role,
                        cost_center_id,
                    }));
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(
                        tenant_id = %tenant_id,
                        entry_number = %entry_number,
                        attempt,
                        "Entry number collision, retrying"
                    );
                }
                Err(e) => {
                    error!(tenant_id = %tenant_id, contract_id = %contract.id, error = %e, "Failed to persist revenue entry");
                    return Err(PostingFailure::Store(e));
                }
            }
        }

        Err(PostingFailure::NumberingExhausted { attempts })
    }

    async fn resolve_accounts(
        &self,
        tenant_id: TenantId,
    ) -> Result<(ResolvedAccount, ResolvedAccount), PostingFailure> {
        let resolver = AccountMappingResolver::new(self.store);

        // Revenue roles are not resolved unless receivables is.
        let receivable = match resolver.resolve(tenant_id, AccountRole::Receivables).await {
            Ok(resolved) => resolved,
            Err(ResolveError::Configuration { role, .. }) => {
                warn!(tenant_id = %tenant_id, role = %role, "Receivables role unresolved");
                return Err(PostingFailure::Configuration {
                    missing_roles: vec![role],
                });
            }
            Err(ResolveError::Store(e)) => return Err(PostingFailure::Store(e)),
        };

        let mut missing_roles = Vec::new();
        for role in REVENUE_ROLE_PRIORITY {
            match resolver.resolve(tenant_id, role).await {
                Ok(revenue) => return Ok((receivable, revenue)),
                Err(ResolveError::Configuration { role, .. }) => missing_roles.push(role),
                Err(ResolveError::Store(e)) => return Err(PostingFailure::Store(e)),
            }
        }

        warn!(tenant_id = %tenant_id, missing_roles = ?missing_roles, "Account roles unresolved");
        Err(PostingFailure::Configuration { missing_roles })
    }

    async fn find_cost_center(&self, tenant_id: TenantId) -> Option<CostCenterId> {
        let code = &self.config.cost_center_code;
        match self.store.find_active_cost_center(tenant_id, code).await {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                warn!(tenant_id = %tenant_id, code = %code, "Cost center not found, posting without it");
                None
            }
            Err(e) => {
                warn!(tenant_id = %tenant_id, code = %code, error = %e, "Cost center lookup failed, posting without it");
                None
            }
        }
    }
}
