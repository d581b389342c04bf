//! Contract creation with revenue posting.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use fleetledger_shared::types::Locale;
use fleetledger_shared::{AppError, PostingConfig};

use super::contract::{ContractRecord, CreateContractInput, ValidatedContract, ValidationError};
use super::fallback::{ProcedureRequest, ProcedureResponse};
use super::messages;
use super::numbering::JournalEntryNumberer;
use super::outcome::{ContractCreationOutcome, ManualEntryReason, PostingPath};
use super::poster::{JournalPoster, PostingOutcome};
use super::store::{ContractProcedure, PostingStore, StoreError};

/// Errors that prevent a contract from being created at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The input is invalid; nothing was attempted.
    #[error("Invalid contract: {0}")]
    Validation(#[from] ValidationError),

    /// Both the direct path and the procedure failed.
    #[error("Contract could not be created: {direct} (fallback: {fallback})")]
    Unavailable {
        /// Direct path failure.
        direct: StoreError,
        /// Procedure failure.
        fallback: StoreError,
    },
}

impl ContractError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingField(_)) => "MISSING_REQUIRED_FIELD",
            Self::Validation(ValidationError::InvalidDateRange { .. }) => "INVALID_DATE_RANGE",
            Self::Validation(ValidationError::AmountOutOfRange { .. }) => "AMOUNT_OUT_OF_RANGE",
            Self::Unavailable { .. } => "CONTRACT_SERVICE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unavailable { .. } => 503,
        }
    }

    /// Returns true if the same request may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl From<ContractError> for AppError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::Validation(e) => Self::Validation(e.to_string()),
            e @ ContractError::Unavailable { .. } => Self::Database(e.to_string()),
        }
    }
}

/// Creates contracts and posts their revenue, keeping the contract when
/// bookkeeping fails.
pub struct ContractRevenuePostingOrchestrator<S, P> {
    store: S,
    procedure: P,
    config: PostingConfig,
}

impl<S: PostingStore, P: ContractProcedure> ContractRevenuePostingOrchestrator<S, P> {
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(store: S, procedure: P, config: PostingConfig) -> Self {
        Self {
            store,
            procedure,
            config,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the posting configuration.
    #[must_use]
    pub const fn config(&self) -> &PostingConfig {
        &self.config
    }

    /// Creates a contract and posts its revenue entry, dated today (UTC)
    /// unless the input carries a contract date.
    ///
    /// # Errors
    ///
    /// See [`Self::create_contract_with_posting_on`].
    pub async fn create_contract_with_posting(
        &self,
        input: CreateContractInput,
    ) -> Result<ContractCreationOutcome, ContractError> {
        self.create_contract_with_posting_on(input, Utc::now().date_naive())
            .await
    }

    /// Creates a contract and posts its revenue entry.
    ///
    /// A posting failure never removes the contract: it stays draft, is
    /// flagged for manual entry, and the outcome carries warnings in the
    /// tenant language given by `input.locale`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input and `Unavailable` when neither the
    /// direct insert nor the database procedure could create the contract.
    pub async fn create_contract_with_posting_on(
        &self,
        input: CreateContractInput,
        today: NaiveDate,
    ) -> Result<ContractCreationOutcome, ContractError> {
        let locale = input.locale.unwrap_or(self.config.default_locale);
        let contract = input.validate(today).inspect_err(|e| {
            warn!(error = %e, "Rejected contract input");
        })?;
        let tenant_id = contract.tenant_id;

        let record = match self.insert_contract(&contract).await {
            Ok(record) => record,
            Err(direct) => {
                warn!(
                    tenant_id = %tenant_id,
                    error = %direct,
                    "Direct contract insert failed, falling back to database procedure"
                );
                return self.create_via_procedure(&contract, direct, locale).await;
            }
        };

        let poster = JournalPoster::new(&self.store, &self.config);
        match poster.post_contract_revenue(&record, locale).await {
            Ok(PostingOutcome::Posted(entry)) => Ok(ContractCreationOutcome::Posted {
                contract: (&record).into(),
                entry: (&entry).into(),
                path: PostingPath::Direct,
            }),
            Ok(PostingOutcome::Skipped) => Ok(ContractCreationOutcome::Draft {
                contract: (&record).into(),
                path: PostingPath::Direct,
            }),
            Err(failure) => {
                warn!(
                    tenant_id = %tenant_id,
                    contract_id = %record.id,
                    code = failure.code(),
                    error = %failure,
                    "Revenue posting failed, contract requires manual entry"
                );
                if let Err(e) = self
                    .store
                    .flag_manual_entry(tenant_id, record.id, &failure.to_string())
                    .await
                {
                    error!(
                        tenant_id = %tenant_id,
                        contract_id = %record.id,
                        error = %e,
                        "Failed to flag contract for manual entry"
                    );
                }
                let reason = ManualEntryReason::Posting(failure);
                let warnings = messages::manual_entry_warnings(locale, &reason);
                Ok(ContractCreationOutcome::ManualEntryRequired {
                    contract: (&record).into(),
                    reason,
                    warnings,
                    path: PostingPath::Direct,
                })
            }
        }
    }

    async fn insert_contract(&self, contract: &ValidatedContract) -> Result<ContractRecord, StoreError> {
        let numberer = JournalEntryNumberer::new(
            &self.store,
            &self.config.entry_prefix,
            &self.config.contract_prefix,
        );
        let attempts = self.config.max_number_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let number = numberer
                .next_contract_number(contract.tenant_id, contract.contract_date)
                .await?;
            match self
                .store
                .insert_contract(contract.to_new_contract(number.clone()))
                .await
            {
                Ok(record) => {
                    info!(
                        tenant_id = %record.tenant_id,
                        contract_id = %record.id,
                        contract_number = %record.contract_number,
                        "Created draft contract"
                    );
                    return Ok(record);
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(
                        tenant_id = %contract.tenant_id,
                        contract_number = %number,
                        attempt,
                        "Contract number collision, retrying"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| StoreError::Database("no contract number attempts made".to_string())))
    }

    async fn create_via_procedure(
        &self,
        contract: &ValidatedContract,
        direct: StoreError,
        locale: Locale,
    ) -> Result<ContractCreationOutcome, ContractError> {
        match self.call_procedure(contract, locale).await {
            Ok(outcome) => {
                info!(
                    tenant_id = %contract.tenant_id,
                    contract_id = %outcome.contract().id,
                    requires_manual_entry = outcome.requires_manual_entry(),
                    "Contract created by database procedure"
                );
                Ok(outcome)
            }
            Err(fallback) => {
                error!(
                    tenant_id = %contract.tenant_id,
                    direct_error = %direct,
                    fallback_error = %fallback,
                    "Contract creation failed on both paths"
                );
                Err(ContractError::Unavailable { direct, fallback })
            }
        }
    }

    async fn call_procedure(
        &self,
        contract: &ValidatedContract,
        locale: Locale,
    ) -> Result<ContractCreationOutcome, StoreError> {
        let payload = ProcedureRequest::from(contract).to_payload()?;
        let raw = self
            .procedure
            .create_contract_with_journal_entry(payload)
            .await?;
        ProcedureResponse::parse(raw)?.into_outcome(contract.amount, locale)
    }
}
