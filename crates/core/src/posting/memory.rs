//! In-memory store used by the posting tests.
//!
//! Every write is staged and applied only when the whole operation
//! succeeds, mirroring a database transaction.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use fleetledger_shared::types::{
    AccountId, ContractId, CostCenterId, JournalEntryId, TenantId,
};

use super::contract::{ContractRecord, ContractStatus, NewContract};
use super::roles::AccountRole;
use super::store::{
    AccountStore, ContractProcedure, ContractStore, JournalStore, SequenceStore, StoreError,
    StoreResult,
};
use crate::ledger::{
    AccountClassification, BalancedEntry, JournalEntryRecord, JournalEntryStatus,
    JournalLineDraft, LedgerAccount, NewLedgerAccount,
};

#[derive(Debug, Clone)]
pub struct MappingRow {
    pub tenant_id: TenantId,
    pub role: AccountRole,
    pub account_id: AccountId,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct CostCenterRow {
    pub id: CostCenterId,
    pub tenant_id: TenantId,
    pub code: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct StoredLine {
    pub entry_id: JournalEntryId,
    pub line_number: i32,
    pub line: JournalLineDraft,
}

#[derive(Debug, Default)]
pub struct State {
    pub accounts: Vec<LedgerAccount>,
    pub mappings: Vec<MappingRow>,
    pub cost_centers: Vec<CostCenterRow>,
    pub sequences: HashMap<(TenantId, String), i64>,
    pub contracts: Vec<ContractRecord>,
    pub entries: Vec<JournalEntryRecord>,
    pub lines: Vec<StoredLine>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    pub contract_insert: bool,
    pub account_insert: bool,
    pub line_insert: bool,
    pub entry_number_taken: bool,
    pub cost_center_lookup: bool,
    pub flag_manual_entry: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub state: Mutex<State>,
    pub faults: Mutex<Faults>,
}

fn unavailable() -> StoreError {
    StoreError::Database("connection reset".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock().unwrap() = faults;
    }

    fn faults(&self) -> Faults {
        *self.faults.lock().unwrap()
    }

    pub fn seed_account(
        &self,
        tenant_id: TenantId,
        code: &str,
        classification: AccountClassification,
        created_at: DateTime<Utc>,
    ) -> AccountId {
        let id = AccountId::new();
        self.state.lock().unwrap().accounts.push(LedgerAccount {
            id,
            tenant_id,
            code: code.to_string(),
            name: format!("Account {code}"),
            name_ar: None,
            classification,
            is_header: false,
            is_active: true,
            auto_provisioned: false,
            created_at,
        });
        id
    }

    pub fn seed_cost_center(&self, tenant_id: TenantId, code: &str) -> CostCenterId {
        let id = CostCenterId::new();
        self.state.lock().unwrap().cost_centers.push(CostCenterRow {
            id,
            tenant_id,
            code: code.to_string(),
            is_active: true,
        });
        id
    }

    pub fn set_sequence(&self, tenant_id: TenantId, scope: &str, value: i64) {
        self.state
            .lock()
            .unwrap()
            .sequences
            .insert((tenant_id, scope.to_string()), value);
    }

    pub fn deactivate_account(&self, account_id: AccountId) {
        let mut state = self.state.lock().unwrap();
        if let Some(account) = state.accounts.iter_mut().find(|a| a.id == account_id) {
            account.is_active = false;
        }
    }

    pub fn contract(&self, id: ContractId) -> ContractRecord {
        self.state
            .lock()
            .unwrap()
            .contracts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap()
    }

    pub fn active_mappings(&self, tenant_id: TenantId, role: AccountRole) -> Vec<AccountId> {
        self.state
            .lock()
            .unwrap()
            .mappings
            .iter()
            .filter(|m| m.tenant_id == tenant_id && m.role == role && m.is_active)
            .map(|m| m.account_id)
            .collect()
    }
}

#[async_trait::async_trait]
impl AccountStore for MemoryStore {
    async fn find_mapped_account(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> StoreResult<Option<LedgerAccount>> {
        let state = self.state.lock().unwrap();
        let mapping = state
            .mappings
            .iter()
            .find(|m| m.tenant_id == tenant_id && m.role == role && m.is_active);
        Ok(mapping.and_then(|m| state.accounts.iter().find(|a| a.id == m.account_id).cloned()))
    }

    async fn find_reusable_account(
        &self,
        tenant_id: TenantId,
        classification: AccountClassification,
    ) -> StoreResult<Option<LedgerAccount>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .filter(|a| {
                a.tenant_id == tenant_id && a.classification == classification && a.is_postable()
            })
            .min_by(|a, b| {
                (a.created_at, &a.code, a.id).cmp(&(b.created_at, &b.code, b.id))
            })
            .cloned())
    }

    async fn insert_account(&self, account: NewLedgerAccount) -> StoreResult<LedgerAccount> {
        if self.faults().account_insert {
            return Err(unavailable());
        }
        let mut state = self.state.lock().unwrap();
        if state
            .accounts
            .iter()
            .any(|a| a.tenant_id == account.tenant_id && a.code == account.code)
        {
            return Err(StoreError::UniqueViolation {
                constraint: "chart_of_accounts_tenant_code_key".to_string(),
            });
        }
        let created_at = state
            .accounts
            .iter()
            .map(|a| a.created_at)
            .max()
            .map_or_else(Utc::now, |latest| latest + Duration::seconds(1));
        let record = LedgerAccount {
            id: AccountId::new(),
            tenant_id: account.tenant_id,
            code: account.code,
            name: account.name,
            name_ar: account.name_ar,
            classification: account.classification,
            is_header: false,
            is_active: true,
            auto_provisioned: account.provisioned_for_role.is_some(),
            created_at,
        };
        state.accounts.push(record.clone());
        Ok(record)
    }

    async fn upsert_role_mapping(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
        account_id: AccountId,
    ) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        for mapping in state
            .mappings
            .iter_mut()
            .filter(|m| m.tenant_id == tenant_id && m.role == role)
        {
            mapping.is_active = false;
        }
        state.mappings.push(MappingRow {
            tenant_id,
            role,
            account_id,
            is_active: true,
        });
        Ok(())
    }

    async fn find_active_cost_center(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> StoreResult<Option<CostCenterId>> {
        if self.faults().cost_center_lookup {
            return Err(unavailable());
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .cost_centers
            .iter()
            .find(|c| c.tenant_id == tenant_id && c.code == code && c.is_active)
            .map(|c| c.id))
    }
}

#[async_trait::async_trait]
impl SequenceStore for MemoryStore {
    async fn next_sequence_value(&self, tenant_id: TenantId, scope: &str) -> StoreResult<i64> {
        let mut state = self.state.lock().unwrap();
        let value = state
            .sequences
            .entry((tenant_id, scope.to_string()))
            .or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

#[async_trait::async_trait]
impl ContractStore for MemoryStore {
    async fn insert_contract(&self, new: NewContract) -> StoreResult<ContractRecord> {
        if self.faults().contract_insert {
            return Err(unavailable());
        }
        let mut state = self.state.lock().unwrap();
        let c = new.contract;
        if state
            .contracts
            .iter()
            .any(|r| r.tenant_id == c.tenant_id && r.contract_number == new.contract_number)
        {
            return Err(StoreError::UniqueViolation {
                constraint: "contracts_tenant_number_key".to_string(),
            });
        }
        let record = ContractRecord {
            id: ContractId::new(),
            tenant_id: c.tenant_id,
            contract_number: new.contract_number,
            customer_id: c.customer_id,
            vehicle_id: c.vehicle_id,
            contract_type: c.contract_type,
            contract_date: c.contract_date,
            start_date: c.start_date,
            end_date: c.end_date,
            amount: c.amount,
            description: c.description,
            status: ContractStatus::Draft,
            journal_entry_id: None,
            requires_manual_entry: false,
            posting_error: None,
            created_at: Utc::now(),
        };
        state.contracts.push(record.clone());
        Ok(record)
    }

    async fn flag_manual_entry(
        &self,
        tenant_id: TenantId,
        contract_id: ContractId,
        reason: &str,
    ) -> StoreResult<()> {
        if self.faults().flag_manual_entry {
            return Err(unavailable());
        }
        let mut state = self.state.lock().unwrap();
        let contract = state
            .contracts
            .iter_mut()
            .find(|c| c.id == contract_id && c.tenant_id == tenant_id)
            .ok_or_else(|| StoreError::NotFound(format!("contract {contract_id}")))?;
        contract.requires_manual_entry = true;
        contract.posting_error = Some(reason.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl JournalStore for MemoryStore {
    async fn commit_contract_entry(
        &self,
        entry: &BalancedEntry,
        entry_number: &str,
        contract_id: ContractId,
    ) -> StoreResult<JournalEntryRecord> {
        let faults = self.faults();
        let mut state = self.state.lock().unwrap();
        let draft = entry.draft();

        if faults.entry_number_taken
            || state
                .entries
                .iter()
                .any(|e| e.tenant_id == draft.tenant_id && e.entry_number == entry_number)
        {
            return Err(StoreError::UniqueViolation {
                constraint: "journal_entries_tenant_number_key".to_string(),
            });
        }

        let header = JournalEntryRecord {
            id: JournalEntryId::new(),
            tenant_id: draft.tenant_id,
            entry_number: entry_number.to_string(),
            entry_date: draft.entry_date,
            total_debit: draft.total_debit,
            total_credit: draft.total_credit,
            status: JournalEntryStatus::Posted,
        };

        let mut staged_lines = Vec::new();
        for (idx, line) in entry.lines().iter().enumerate() {
            if faults.line_insert {
                // Dropping the staged header is the rollback.
                return Err(unavailable());
            }
            staged_lines.push(StoredLine {
                entry_id: header.id,
                line_number: i32::try_from(idx + 1).unwrap(),
                line: line.clone(),
            });
        }

        let contract = state
            .contracts
            .iter_mut()
            .find(|c| {
                c.id == contract_id
                    && c.tenant_id == draft.tenant_id
                    && c.status == ContractStatus::Draft
                    && c.journal_entry_id.is_none()
            })
            .ok_or_else(|| StoreError::NotFound(format!("draft contract {contract_id}")))?;
        contract.journal_entry_id = Some(header.id);
        contract.status = ContractStatus::Active;

        state.entries.push(header.clone());
        state.lines.extend(staged_lines);
        Ok(header)
    }
}

/// Procedure double that counts calls and returns a canned response.
pub struct FakeProcedure {
    pub calls: AtomicUsize,
    pub response: Mutex<Result<Value, StoreError>>,
    pub last_payload: Mutex<Option<Value>>,
}

impl FakeProcedure {
    pub fn returning(response: Result<Value, StoreError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(response),
            last_payload: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContractProcedure for FakeProcedure {
    async fn create_contract_with_journal_entry(&self, payload: Value) -> StoreResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload);
        self.response.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl<T: ContractProcedure> ContractProcedure for std::sync::Arc<T> {
    async fn create_contract_with_journal_entry(&self, payload: Value) -> StoreResult<Value> {
        (**self).create_contract_with_journal_entry(payload).await
    }
}
