//! Result of creating a contract with its revenue entry.

use serde::Serialize;
use fleetledger_shared::types::{ContractId, JournalEntryId};

use super::contract::ContractRecord;
use super::poster::{PostedEntry, PostingFailure};

/// Which path created the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingPath {
    /// Contract insert and posting performed by this service.
    Direct,
    /// The database-side atomic procedure.
    Procedure,
}

/// Summary of a contract created by either path.
///
/// The procedure path only returns identifiers, so this is the common subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSummary {
    /// Contract ID.
    pub id: ContractId,
    /// Contract number.
    pub contract_number: String,
}

impl From<&ContractRecord> for ContractSummary {
    fn from(record: &ContractRecord) -> Self {
        Self {
            id: record.id,
            contract_number: record.contract_number.clone(),
        }
    }
}

/// Summary of a posted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Entry number.
    pub entry_number: String,
}

impl From<&PostedEntry> for EntrySummary {
    fn from(entry: &PostedEntry) -> Self {
        Self {
            id: entry.entry_id,
            entry_number: entry.entry_number.clone(),
        }
    }
}

/// Why the contract needs a manual revenue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualEntryReason {
    /// Direct posting failed.
    Posting(PostingFailure),
    /// The procedure created the contract but reported it did not post.
    ReportedByProcedure {
        /// Message from the procedure, if any.
        message: Option<String>,
    },
    /// The procedure returned an incomplete entry reference.
    UnverifiedProcedureResult,
}

impl std::fmt::Display for ManualEntryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Posting(failure) => write!(f, "{failure}"),
            Self::ReportedByProcedure { message: Some(m) } => write!(f, "Procedure reported: {m}"),
            Self::ReportedByProcedure { message: None } => {
                f.write_str("Procedure reported that manual entry is required")
            }
            Self::UnverifiedProcedureResult => {
                f.write_str("Procedure returned an incomplete journal entry reference")
            }
        }
    }
}

/// Outcome of `create_contract_with_posting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCreationOutcome {
    /// Contract created and revenue posted; the contract is active.
    Posted {
        /// The contract.
        contract: ContractSummary,
        /// The posted entry.
        entry: EntrySummary,
        /// Which path did the work.
        path: PostingPath,
    },
    /// Contract created with nothing to post; the contract stays draft.
    Draft {
        /// The contract.
        contract: ContractSummary,
        /// Which path did the work.
        path: PostingPath,
    },
    /// Contract created but its revenue entry must be booked by hand.
    ManualEntryRequired {
        /// The contract.
        contract: ContractSummary,
        /// Failure cause.
        reason: ManualEntryReason,
        /// Localized user-facing warnings; never empty.
        warnings: Vec<String>,
        /// Which path did the work.
        path: PostingPath,
    },
}

impl ContractCreationOutcome {
    /// Returns the created contract.
    #[must_use]
    pub const fn contract(&self) -> &ContractSummary {
        match self {
            Self::Posted { contract, .. }
            | Self::Draft { contract, .. }
            | Self::ManualEntryRequired { contract, .. } => contract,
        }
    }

    /// Returns the path that created the contract.
    #[must_use]
    pub const fn path(&self) -> PostingPath {
        match self {
            Self::Posted { path, .. }
            | Self::Draft { path, .. }
            | Self::ManualEntryRequired { path, .. } => *path,
        }
    }

    /// Returns true when the revenue entry must be booked manually.
    #[must_use]
    pub const fn requires_manual_entry(&self) -> bool {
        matches!(self, Self::ManualEntryRequired { .. })
    }
}

/// Flat serializable projection of [`ContractCreationOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCreationResult {
    /// Contract ID.
    pub contract_id: ContractId,
    /// Contract number.
    pub contract_number: String,
    /// Posted entry ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_entry_id: Option<JournalEntryId>,
    /// Posted entry number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_entry_number: Option<String>,
    /// Present and true when a manual entry is required.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_manual_entry: bool,
    /// Localized warnings.
    pub warnings: Vec<String>,
}

impl From<ContractCreationOutcome> for ContractCreationResult {
    fn from(outcome: ContractCreationOutcome) -> Self {
        match outcome {
            ContractCreationOutcome::Posted {
                contract, entry, ..
            } => Self {
                contract_id: contract.id,
                contract_number: contract.contract_number,
                journal_entry_id: Some(entry.id),
                journal_entry_number: Some(entry.entry_number),
                requires_manual_entry: false,
                warnings: Vec::new(),
            },
            ContractCreationOutcome::Draft { contract, .. } => Self {
                contract_id: contract.id,
                contract_number: contract.contract_number,
                journal_entry_id: None,
                journal_entry_number: None,
                requires_manual_entry: false,
                warnings: Vec::new(),
            },
            ContractCreationOutcome::ManualEntryRequired {
                contract, warnings, ..
            } => Self {
                contract_id: contract.id,
                contract_number: contract.contract_number,
                journal_entry_id: None,
                journal_entry_number: None,
                requires_manual_entry: true,
                warnings,
            },
        }
    }
}
