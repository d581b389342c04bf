//! Resolution of account roles to concrete ledger accounts.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use fleetledger_shared::types::{AccountId, TenantId};

use super::provisioner::LedgerAccountProvisioner;
use super::roles::{AccountRole, AccountRoleRegistry};
use super::store::{AccountStore, StoreError};
use crate::ledger::LedgerAccount;

/// Errors from role resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No usable account exists and none could be provisioned.
    #[error("No ledger account configured for role {role}")]
    Configuration {
        /// The unresolved role.
        role: AccountRole,
        /// Store failure that prevented provisioning, if any.
        source: Option<StoreError>,
    },

    /// Lookup or mapping write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where a resolved account came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// An existing active mapping.
    Mapping,
    /// An existing account of the right classification, now mapped.
    ExistingAccount,
    /// A newly provisioned account, now mapped.
    Provisioned,
}

impl ResolutionSource {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::ExistingAccount => "existing",
            Self::Provisioned => "provisioned",
        }
    }
}

/// A role resolved to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAccount {
    /// The role.
    pub role: AccountRole,
    /// The account serving it.
    pub account_id: AccountId,
    /// How it was found.
    pub source: ResolutionSource,
}

/// Maps `(tenant, role)` to a ledger account, creating what is missing.
pub struct AccountMappingResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: AccountStore + ?Sized> AccountMappingResolver<'a, S> {
    /// Creates a new resolver.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolves `role` for `tenant_id`.
    ///
    /// Order: active mapping to a postable account, then the oldest active
    /// non-header account of the role's classification, then a provisioned
    /// account. The latter two are persisted as the role's mapping.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when no account can be found or provisioned,
    /// and `Store` for lookup or mapping failures.
    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> Result<ResolvedAccount, ResolveError> {
        let def = AccountRoleRegistry::definition(role);

        if let Some(account) = self.store.find_mapped_account(tenant_id, role).await? {
            if account.is_postable() && account.classification == def.classification {
                debug!(
                    tenant_id = %tenant_id,
                    role = %role,
                    account_id = %account.id,
                    source = ResolutionSource::Mapping.as_str(),
                    "Resolved account role"
                );
                return Ok(ResolvedAccount {
                    role,
                    account_id: account.id,
                    source: ResolutionSource::Mapping,
                });
            }
            warn!(
                tenant_id = %tenant_id,
                role = %role,
                account_id = %account.id,
                "Mapped account is no longer postable, superseding mapping"
            );
        }

        let (account, source) = match self
            .store
            .find_reusable_account(tenant_id, def.classification)
            .await?
        {
            Some(account) => (account, ResolutionSource::ExistingAccount),
            None => self.provision(tenant_id, role).await?,
        };

        let account_id = self.bind(tenant_id, role, &account).await?;
        info!(
            tenant_id = %tenant_id,
            role = %role,
            account_id = %account_id,
            source = source.as_str(),
            "Resolved account role"
        );
        Ok(ResolvedAccount {
            role,
            account_id,
            source,
        })
    }

    async fn provision(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> Result<(LedgerAccount, ResolutionSource), ResolveError> {
        let provisioner = LedgerAccountProvisioner::new(self.store);
        match provisioner.provision(tenant_id, role).await {
            Ok(account) => Ok((account, ResolutionSource::Provisioned)),
            Err(e) if e.is_unique_violation() => {
                // A concurrent request may have provisioned it first.
                let def = AccountRoleRegistry::definition(role);
                match self
                    .store
                    .find_reusable_account(tenant_id, def.classification)
                    .await?
                {
                    Some(account) => Ok((account, ResolutionSource::ExistingAccount)),
                    None => {
                        warn!(tenant_id = %tenant_id, role = %role, error = %e, "Default account code is taken by an unusable account");
                        Err(ResolveError::Configuration {
                            role,
                            source: Some(e),
                        })
                    }
                }
            }
            Err(e) => {
                warn!(tenant_id = %tenant_id, role = %role, error = %e, "Failed to provision ledger account");
                Err(ResolveError::Configuration {
                    role,
                    source: Some(e),
                })
            }
        }
    }

    async fn bind(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
        account: &LedgerAccount,
    ) -> Result<AccountId, ResolveError> {
        match self
            .store
            .upsert_role_mapping(tenant_id, role, account.id)
            .await
        {
            Ok(()) => Ok(account.id),
            Err(e) if e.is_unique_violation() => {
                // Lost the race to another writer; use its mapping.
                match self.store.find_mapped_account(tenant_id, role).await? {
                    Some(winner) if winner.is_postable() => {
                        debug!(tenant_id = %tenant_id, role = %role, account_id = %winner.id, "Using concurrently written mapping");
                        Ok(winner.id)
                    }
                    _ => Err(ResolveError::Store(e)),
                }
            }
            Err(e) => Err(ResolveError::Store(e)),
        }
    }
}
