//! Payload and response handling for the database-side contract procedure.
//!
//! The procedure's response is not trusted: every field is optional on the
//! wire and an incomplete entry reference is surfaced as needing manual
//! review rather than as a posted entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use fleetledger_shared::types::{
    ContractId, CustomerId, JournalEntryId, Locale, TenantId, UserId, VehicleId,
};

use super::contract::{ContractType, ValidatedContract};
use super::messages;
use super::outcome::{
    ContractCreationOutcome, ContractSummary, EntrySummary, ManualEntryReason, PostingPath,
};
use super::store::StoreError;

/// Arguments passed to `create_contract_with_journal_entry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureRequest {
    /// Owning tenant.
    pub company_id: TenantId,
    /// Customer.
    pub customer_id: CustomerId,
    /// Vehicle.
    pub vehicle_id: Option<VehicleId>,
    /// Contract type.
    pub contract_type: ContractType,
    /// Signing date.
    pub contract_date: NaiveDate,
    /// First rental day.
    pub start_date: NaiveDate,
    /// Last rental day.
    pub end_date: NaiveDate,
    /// Total amount.
    pub contract_amount: Decimal,
    /// Monthly installment.
    pub monthly_amount: Option<Decimal>,
    /// Description.
    pub description: Option<String>,
    /// Terms.
    pub terms: Option<String>,
    /// Creating user.
    pub created_by: Option<UserId>,
}

impl From<&ValidatedContract> for ProcedureRequest {
    fn from(contract: &ValidatedContract) -> Self {
        Self {
            company_id: contract.tenant_id,
            customer_id: contract.customer_id,
            vehicle_id: contract.vehicle_id,
            contract_type: contract.contract_type,
            contract_date: contract.contract_date,
            start_date: contract.start_date,
            end_date: contract.end_date,
            contract_amount: contract.amount,
            monthly_amount: contract.monthly_amount,
            description: contract.description.clone(),
            terms: contract.terms.clone(),
            created_by: contract.created_by,
        }
    }
}

impl ProcedureRequest {
    /// Serializes the request as the procedure's JSON argument.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if serialization fails.
    pub fn to_payload(&self) -> Result<Value, StoreError> {
        serde_json::to_value(self).map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }
}

/// The procedure's JSON result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcedureResponse {
    /// Whether the procedure considers the call successful.
    pub success: Option<bool>,
    /// Created contract.
    pub contract_id: Option<Uuid>,
    /// Created contract number.
    pub contract_number: Option<String>,
    /// Posted entry.
    pub journal_entry_id: Option<Uuid>,
    /// Posted entry number.
    pub journal_entry_number: Option<String>,
    /// Set when the procedure skipped posting.
    pub requires_manual_entry: Option<bool>,
    /// Procedure warnings.
    pub warnings: Option<Vec<String>>,
    /// Short error.
    pub error: Option<String>,
    /// Detailed error.
    pub error_message: Option<String>,
}

impl ProcedureResponse {
    /// Parses the raw JSON result.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the value is not an object of the
    /// expected shape.
    pub fn parse(value: Value) -> Result<Self, StoreError> {
        if !value.is_object() {
            return Err(StoreError::MalformedResponse(format!(
                "expected an object, got {value}"
            )));
        }
        serde_json::from_value(value).map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }

    fn failure_message(&self) -> Option<String> {
        self.error_message.clone().or_else(|| self.error.clone())
    }

    /// Interprets the response for a contract of `amount`.
    ///
    /// A contract with a positive amount and no entry reference is never
    /// reported as a plain draft: it needs manual entry.
    ///
    /// # Errors
    ///
    /// Returns `Database` when the procedure reported failure, and
    /// `MalformedResponse` when no contract reference came back.
    pub fn into_outcome(
        self,
        amount: Decimal,
        locale: Locale,
    ) -> Result<ContractCreationOutcome, StoreError> {
        if self.success == Some(false) {
            return Err(StoreError::Database(
                self.failure_message()
                    .unwrap_or_else(|| "contract procedure reported failure".to_string()),
            ));
        }

        let (Some(contract_id), Some(contract_number)) =
            (self.contract_id, self.contract_number.clone())
        else {
            return Err(StoreError::MalformedResponse(
                "contract procedure returned no contract reference".to_string(),
            ));
        };
        let contract = ContractSummary {
            id: ContractId::from_uuid(contract_id),
            contract_number,
        };
        let path = PostingPath::Procedure;

        let reason = if self.requires_manual_entry == Some(true) {
            Some(ManualEntryReason::ReportedByProcedure {
                message: self.failure_message(),
            })
        } else {
            match (self.journal_entry_id, self.journal_entry_number.clone()) {
                (Some(id), Some(entry_number)) => {
                    return Ok(ContractCreationOutcome::Posted {
                        contract,
                        entry: EntrySummary {
                            id: JournalEntryId::from_uuid(id),
                            entry_number,
                        },
                        path,
                    });
                }
                (None, None) if amount <= Decimal::ZERO => None,
                _ => Some(ManualEntryReason::UnverifiedProcedureResult),
            }
        };

        Ok(match reason {
            None => ContractCreationOutcome::Draft { contract, path },
            Some(reason) => {
                let mut warnings = messages::manual_entry_warnings(locale, &reason);
                for extra in self.warnings.unwrap_or_default() {
                    if !warnings.contains(&extra) {
                        warnings.push(extra);
                    }
                }
                ContractCreationOutcome::ManualEntryRequired {
                    contract,
                    reason,
                    warnings,
                    path,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_posted_response() {
        let contract_id = Uuid::now_v7();
        let entry_id = Uuid::now_v7();
        let response = ProcedureResponse::parse(json!({
            "success": true,
            "contract_id": contract_id,
            "contract_number": "CON-26-0003",
            "journal_entry_id": entry_id,
            "journal_entry_number": "JE-20260101-0009",
        }))
        .unwrap();

        match response.into_outcome(dec!(1200), Locale::En).unwrap() {
            ContractCreationOutcome::Posted {
                contract, entry, path,
            } => {
                assert_eq!(contract.id.into_inner(), contract_id);
                assert_eq!(entry.id.into_inner(), entry_id);
                assert_eq!(path, PostingPath::Procedure);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_half_entry_reference_is_unverified() {
        let response = ProcedureResponse::parse(json!({
            "contract_id": Uuid::now_v7(),
            "contract_number": "CON-26-0003",
            "journal_entry_number": "JE-20260101-0009",
        }))
        .unwrap();

        match response.into_outcome(dec!(1200), Locale::Ar).unwrap() {
            ContractCreationOutcome::ManualEntryRequired {
                reason, warnings, ..
            } => {
                assert_eq!(reason, ManualEntryReason::UnverifiedProcedureResult);
                assert!(!warnings.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_manual_entry_flag_keeps_procedure_warnings() {
        let response = ProcedureResponse::parse(json!({
            "success": true,
            "contract_id": Uuid::now_v7(),
            "contract_number": "CON-26-0004",
            "requires_manual_entry": true,
            "warnings": ["Revenue account missing"],
        }))
        .unwrap();

        let outcome = response.into_outcome(dec!(1200), Locale::En).unwrap();
        let ContractCreationOutcome::ManualEntryRequired { warnings, .. } = outcome else {
            panic!("expected manual entry outcome");
        };
        assert!(warnings.contains(&"Revenue account missing".to_string()));
    }

    #[test]
    fn test_no_entry_for_zero_amount_is_draft() {
        let response = ProcedureResponse::parse(json!({
            "contract_id": Uuid::now_v7(),
            "contract_number": "CON-26-0005",
        }))
        .unwrap();
        assert!(matches!(
            response.into_outcome(Decimal::ZERO, Locale::En).unwrap(),
            ContractCreationOutcome::Draft { .. }
        ));
    }

    #[test]
    fn test_no_entry_for_positive_amount_requires_manual_entry() {
        let response = ProcedureResponse::parse(json!({
            "success": true,
            "contract_id": Uuid::now_v7(),
            "contract_number": "CON-26-0006",
        }))
        .unwrap();

        match response.into_outcome(dec!(1200.000), Locale::En).unwrap() {
            ContractCreationOutcome::ManualEntryRequired {
                reason, warnings, ..
            } => {
                assert_eq!(reason, ManualEntryReason::UnverifiedProcedureResult);
                assert!(!warnings.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_failure_and_malformed_responses() {
        let failed = ProcedureResponse::parse(json!({
            "success": false,
            "error_message": "customer blocked",
        }))
        .unwrap();
        assert_eq!(
            failed.into_outcome(dec!(10), Locale::En),
            Err(StoreError::Database("customer blocked".to_string()))
        );

        let missing = ProcedureResponse::parse(json!({ "success": true })).unwrap();
        assert!(matches!(
            missing.into_outcome(dec!(10), Locale::En),
            Err(StoreError::MalformedResponse(_))
        ));

        assert!(ProcedureResponse::parse(json!("ok")).is_err());
        assert!(ProcedureResponse::parse(json!({ "contract_id": 42 })).is_err());
    }
}
