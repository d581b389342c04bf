//! Adapter for the `create_contract_with_journal_entry` database function.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde_json::Value;
use tracing::debug;
use fleetledger_core::posting::{ContractProcedure, StoreError, StoreResult};

use super::posting::store_error;

const CALL_PROCEDURE_SQL: &str = "SELECT create_contract_with_journal_entry($1::jsonb) AS result";

/// Calls the stored function that creates a contract and its entry in one
/// round trip. The function is provisioned outside this crate's migrations.
#[derive(Debug, Clone)]
pub struct PgContractProcedure {
    db: DatabaseConnection,
}

impl PgContractProcedure {
    /// Creates a new procedure adapter.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl ContractProcedure for PgContractProcedure {
    async fn create_contract_with_journal_entry(&self, payload: Value) -> StoreResult<Value> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                CALL_PROCEDURE_SQL,
                [payload.into()],
            ))
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::MalformedResponse("procedure returned no row".to_string()))?;

        let result: Option<Value> = row.try_get("", "result").map_err(store_error)?;
        debug!(has_result = result.is_some(), "Contract procedure returned");
        result.ok_or_else(|| StoreError::MalformedResponse("procedure returned null".to_string()))
    }
}
