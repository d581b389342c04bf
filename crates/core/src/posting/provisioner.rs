//! Creation of missing ledger accounts from role defaults.

use tracing::info;
use fleetledger_shared::types::TenantId;

use super::roles::{AccountRole, AccountRoleRegistry};
use super::store::{AccountStore, StoreResult};
use crate::ledger::{LedgerAccount, NewLedgerAccount};

/// Creates chart-of-accounts rows for roles a tenant has not configured.
pub struct LedgerAccountProvisioner<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: AccountStore + ?Sized> LedgerAccountProvisioner<'a, S> {
    /// Creates a new provisioner.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Builds the account the registry prescribes for `role`.
    #[must_use]
    pub fn account_for(tenant_id: TenantId, role: AccountRole) -> NewLedgerAccount {
        let def = AccountRoleRegistry::definition(role);
        NewLedgerAccount {
            tenant_id,
            code: def.default_code.to_string(),
            name: def.name_en.to_string(),
            name_ar: Some(def.name_ar.to_string()),
            classification: def.classification,
            provisioned_for_role: Some(role.code().to_string()),
        }
    }

    /// Inserts the default account for `role`.
    ///
    /// # Errors
    ///
    /// Propagates the store error; a unique violation means the code is taken.
    pub async fn provision(&self, tenant_id: TenantId, role: AccountRole) -> StoreResult<LedgerAccount> {
        let account = self
            .store
            .insert_account(Self::account_for(tenant_id, role))
            .await?;
        info!(
            tenant_id = %tenant_id,
            role = %role,
            account_id = %account.id,
            code = %account.code,
            "Provisioned ledger account"
        );
        Ok(account)
    }
}
