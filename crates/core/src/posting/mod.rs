//! Contract revenue posting.
//!
//! Turns a signed rental contract into a balanced journal entry:
//! - Account roles and their per-tenant resolution ([`AccountMappingResolver`])
//! - Provisioning of missing accounts ([`LedgerAccountProvisioner`])
//! - Entry and contract numbering ([`JournalEntryNumberer`])
//! - The two-line revenue entry ([`JournalPoster`])
//! - Contract creation with partial-failure handling and a database
//!   procedure fallback ([`ContractRevenuePostingOrchestrator`])

pub mod contract;
pub mod fallback;
pub mod messages;
pub mod numbering;
pub mod orchestrator;
pub mod outcome;
pub mod poster;
pub mod provisioner;
pub mod resolver;
pub mod roles;
pub mod store;

#[cfg(test)]
mod memory;

pub use contract::{
    ContractRecord, ContractStatus, ContractType, CreateContractInput, NewContract,
    ValidatedContract, ValidationError,
};
pub use fallback::{ProcedureRequest, ProcedureResponse};
pub use numbering::{
    CONTRACT_SEQUENCE_SCOPE, JournalEntryNumberer, entry_sequence_scope, format_contract_number,
    format_entry_number,
};
pub use orchestrator::{ContractError, ContractRevenuePostingOrchestrator};
pub use outcome::{
    ContractCreationOutcome, ContractCreationResult, ContractSummary, EntrySummary,
    ManualEntryReason, PostingPath,
};
pub use poster::{CONTRACT_REFERENCE_TYPE, JournalPoster, PostedEntry, PostingFailure, PostingOutcome};
pub use provisioner::LedgerAccountProvisioner;
pub use resolver::{AccountMappingResolver, ResolutionSource, ResolveError, ResolvedAccount};
pub use roles::{AccountRole, AccountRoleRegistry, REVENUE_ROLE_PRIORITY, RoleDefinition};
pub use store::{
    AccountStore, ContractProcedure, ContractStore, JournalStore, PostingStore, SequenceStore,
    StoreError, StoreResult,
};
