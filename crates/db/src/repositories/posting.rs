//! PostgreSQL implementation of the posting store ports.
//!
//! Every multi-row write runs in one database transaction; dropping the
//! transaction on an error path rolls it back.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, Statement, TransactionTrait,
};
use tracing::{debug, error};
use fleetledger_core::ledger::{
    AccountClassification as CoreClassification, BalancedEntry, JournalEntryRecord,
    LedgerAccount, NewLedgerAccount,
};
use fleetledger_core::posting::{
    AccountRole, AccountStore, ContractRecord, ContractStore, JournalStore, NewContract,
    SequenceStore, StoreError, StoreResult,
};
use fleetledger_shared::types::{
    AccountId, AccountMappingId, ContractId, CostCenterId, CustomerId, JournalEntryId,
    JournalEntryLineId, TenantId, VehicleId,
};

use crate::entities::{
    account_mappings, chart_of_accounts, contracts, cost_centers, journal_entries,
    journal_entry_lines,
    sea_orm_active_enums::{AccountClassification, ContractStatus, JournalEntryStatus},
};

const NEXT_SEQUENCE_SQL: &str = r"
INSERT INTO document_sequences (tenant_id, scope, last_value)
VALUES ($1, $2, 1)
ON CONFLICT (tenant_id, scope)
DO UPDATE SET last_value = document_sequences.last_value + 1, updated_at = now()
RETURNING last_value
";

/// Maps a `DbErr` to the store error the posting core understands.
#[must_use]
pub fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(constraint)) => {
            StoreError::UniqueViolation { constraint }
        }
        _ => StoreError::Database(err.to_string()),
    }
}

fn to_ledger_account(model: chart_of_accounts::Model) -> LedgerAccount {
    LedgerAccount {
        id: AccountId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        code: model.code,
        name: model.name,
        name_ar: model.name_ar,
        classification: model.classification.into(),
        is_header: model.is_header,
        is_active: model.is_active,
        auto_provisioned: model.auto_provisioned,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn to_contract_record(model: contracts::Model) -> ContractRecord {
    ContractRecord {
        id: ContractId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        contract_number: model.contract_number,
        customer_id: CustomerId::from_uuid(model.customer_id),
        vehicle_id: model.vehicle_id.map(VehicleId::from_uuid),
        contract_type: model.contract_type.into(),
        contract_date: model.contract_date,
        start_date: model.start_date,
        end_date: model.end_date,
        amount: model.contract_amount,
        description: model.description,
        status: model.status.into(),
        journal_entry_id: model.journal_entry_id.map(JournalEntryId::from_uuid),
        requires_manual_entry: model.requires_manual_entry,
        posting_error: model.posting_error,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Posting store over a `SeaORM` connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmPostingStore {
    db: DatabaseConnection,
}

impl SeaOrmPostingStore {
    /// Creates a new posting store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait::async_trait]
impl AccountStore for SeaOrmPostingStore {
    async fn find_mapped_account(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> StoreResult<Option<LedgerAccount>> {
        let found = account_mappings::Entity::find()
            .filter(account_mappings::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(account_mappings::Column::RoleCode.eq(role.code()))
            .filter(account_mappings::Column::IsActive.eq(true))
            .find_also_related(chart_of_accounts::Entity)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(found
            .and_then(|(_, account)| account)
            .map(to_ledger_account))
    }

    async fn find_reusable_account(
        &self,
        tenant_id: TenantId,
        classification: CoreClassification,
    ) -> StoreResult<Option<LedgerAccount>> {
        let account = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(
                chart_of_accounts::Column::Classification
                    .eq(AccountClassification::from(classification)),
            )
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .filter(chart_of_accounts::Column::IsHeader.eq(false))
            .order_by_asc(chart_of_accounts::Column::CreatedAt)
            .order_by_asc(chart_of_accounts::Column::Code)
            .order_by_asc(chart_of_accounts::Column::Id)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(account.map(to_ledger_account))
    }

    async fn insert_account(&self, account: NewLedgerAccount) -> StoreResult<LedgerAccount> {
        let now = Utc::now().into();
        let model = chart_of_accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            tenant_id: Set(account.tenant_id.into_inner()),
            code: Set(account.code),
            name: Set(account.name),
            name_ar: Set(account.name_ar),
            classification: Set(account.classification.into()),
            parent_id: Set(None),
            is_header: Set(false),
            is_active: Set(true),
            auto_provisioned: Set(account.provisioned_for_role.is_some()),
            provisioned_for_role: Set(account.provisioned_for_role),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        Ok(to_ledger_account(model))
    }

    async fn upsert_role_mapping(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
        account_id: AccountId,
    ) -> StoreResult<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let txn = self.db.begin().await.map_err(store_error)?;

        let superseded = account_mappings::Entity::update_many()
            .col_expr(account_mappings::Column::IsActive, Expr::value(false))
            .col_expr(account_mappings::Column::UpdatedAt, Expr::value(now))
            .filter(account_mappings::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(account_mappings::Column::RoleCode.eq(role.code()))
            .filter(account_mappings::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        account_mappings::ActiveModel {
            id: Set(AccountMappingId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            role_code: Set(role.code().to_string()),
            ledger_account_id: Set(account_id.into_inner()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;
        debug!(
            tenant_id = %tenant_id,
            role = %role,
            account_id = %account_id,
            superseded = superseded.rows_affected,
            "Upserted account mapping"
        );
        Ok(())
    }

    async fn find_active_cost_center(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> StoreResult<Option<CostCenterId>> {
        let center = cost_centers::Entity::find()
            .filter(cost_centers::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(cost_centers::Column::Code.eq(code))
            .filter(cost_centers::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(center.map(|c| CostCenterId::from_uuid(c.id)))
    }
}

#[async_trait::async_trait]
impl SequenceStore for SeaOrmPostingStore {
    async fn next_sequence_value(&self, tenant_id: TenantId, scope: &str) -> StoreResult<i64> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                NEXT_SEQUENCE_SQL,
                [tenant_id.into_inner().into(), scope.into()],
            ))
            .await
            .map_err(store_error)?
            .ok_or_else(|| {
                StoreError::MalformedResponse("sequence upsert returned no row".to_string())
            })?;

        row.try_get::<i64>("", "last_value").map_err(store_error)
    }
}

#[async_trait::async_trait]
impl ContractStore for SeaOrmPostingStore {
    async fn insert_contract(&self, new: NewContract) -> StoreResult<ContractRecord> {
        let now = Utc::now().into();
        let c = new.contract;
        let model = contracts::ActiveModel {
            id: Set(ContractId::new().into_inner()),
            tenant_id: Set(c.tenant_id.into_inner()),
            contract_number: Set(new.contract_number),
            customer_id: Set(c.customer_id.into_inner()),
            vehicle_id: Set(c.vehicle_id.map(VehicleId::into_inner)),
            contract_type: Set(c.contract_type.into()),
            contract_date: Set(c.contract_date),
            start_date: Set(c.start_date),
            end_date: Set(c.end_date),
            contract_amount: Set(c.amount),
            monthly_amount: Set(c.monthly_amount),
            description: Set(c.description),
            terms: Set(c.terms),
            status: Set(ContractStatus::Draft),
            journal_entry_id: Set(None),
            requires_manual_entry: Set(false),
            posting_error: Set(None),
            created_by: Set(c.created_by.map(Into::into)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        Ok(to_contract_record(model))
    }

    async fn flag_manual_entry(
        &self,
        tenant_id: TenantId,
        contract_id: ContractId,
        reason: &str,
    ) -> StoreResult<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let result = contracts::Entity::update_many()
            .col_expr(contracts::Column::RequiresManualEntry, Expr::value(true))
            .col_expr(contracts::Column::PostingError, Expr::value(reason))
            .col_expr(contracts::Column::UpdatedAt, Expr::value(now))
            .filter(contracts::Column::Id.eq(contract_id.into_inner()))
            .filter(contracts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(contracts::Column::Status.eq(ContractStatus::Draft))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(format!("draft contract {contract_id}")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl JournalStore for SeaOrmPostingStore {
    async fn commit_contract_entry(
        &self,
        entry: &BalancedEntry,
        entry_number: &str,
        contract_id: ContractId,
    ) -> StoreResult<JournalEntryRecord> {
        let draft = entry.draft();
        let now = Utc::now().into();
        let txn = self.db.begin().await.map_err(store_error)?;

        // Lock the contract first so concurrent posters for it serialize.
        let contract = contracts::Entity::find_by_id(contract_id.into_inner())
            .filter(contracts::Column::TenantId.eq(draft.tenant_id.into_inner()))
            .filter(contracts::Column::Status.eq(ContractStatus::Draft))
            .filter(contracts::Column::JournalEntryId.is_null())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::NotFound(format!("draft contract {contract_id}")))?;

        let (reference_type, reference_id) = draft
            .reference
            .as_ref()
            .map(|r| (r.reference_type.clone(), r.reference_id))
            .unzip();

        let header = journal_entries::ActiveModel {
            id: Set(JournalEntryId::new().into_inner()),
            tenant_id: Set(draft.tenant_id.into_inner()),
            entry_number: Set(entry_number.to_string()),
            entry_date: Set(draft.entry_date),
            description: Set(draft.description.clone()),
            reference_type: Set(reference_type),
            reference_id: Set(reference_id),
            total_debit: Set(draft.total_debit),
            total_credit: Set(draft.total_credit),
            status: Set(JournalEntryStatus::Posted),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(store_error)?;

        for (idx, line) in entry.lines().iter().enumerate() {
            let line_number = i32::try_from(idx + 1)
                .map_err(|_| StoreError::Database("too many journal lines".to_string()))?;
            journal_entry_lines::ActiveModel {
                id: Set(JournalEntryLineId::new().into_inner()),
                journal_entry_id: Set(header.id),
                account_id: Set(line.account_id.into_inner()),
                cost_center_id: Set(line.cost_center_id.map(CostCenterId::into_inner)),
                line_number: Set(line_number),
                line_description: Set(line.description.clone()),
                debit_amount: Set(line.debit_amount),
                credit_amount: Set(line.credit_amount),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(entry_id = %header.id, line_number, error = %e, "Failed to insert journal line");
                store_error(e)
            })?;
        }

        let mut active: contracts::ActiveModel = contract.into();
        active.journal_entry_id = Set(Some(header.id));
        active.status = Set(ContractStatus::Active);
        active.requires_manual_entry = Set(false);
        active.posting_error = Set(None);
        active.updated_at = Set(now);
        active.update(&txn).await.map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;

        Ok(JournalEntryRecord {
            id: JournalEntryId::from_uuid(header.id),
            tenant_id: TenantId::from_uuid(header.tenant_id),
            entry_number: header.entry_number,
            entry_date: header.entry_date,
            total_debit: header.total_debit,
            total_credit: header.total_credit,
            status: header.status.into(),
        })
    }
}
