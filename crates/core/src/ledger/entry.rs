//! Journal entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use fleetledger_shared::types::{AccountId, CostCenterId, JournalEntryId, TenantId};

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

/// One line of a journal entry before it is persisted.
///
/// Both amounts are carried so a malformed line (both sides set, or neither)
/// can be represented and rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineDraft {
    /// Account the line posts to.
    pub account_id: AccountId,
    /// Optional cost center.
    pub cost_center_id: Option<CostCenterId>,
    /// Line description.
    pub description: String,
    /// Debit amount; zero on credit lines.
    pub debit_amount: Decimal,
    /// Credit amount; zero on debit lines.
    pub credit_amount: Decimal,
}

impl JournalLineDraft {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            cost_center_id: None,
            description: description.into(),
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            cost_center_id: None,
            description: description.into(),
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
        }
    }

    /// Attaches a cost center.
    #[must_use]
    pub fn with_cost_center(mut self, cost_center_id: Option<CostCenterId>) -> Self {
        self.cost_center_id = cost_center_id;
        self
    }

    /// Returns the line's side, or `None` when neither amount is set.
    #[must_use]
    pub fn side(&self) -> Option<EntrySide> {
        if self.debit_amount > Decimal::ZERO {
            Some(EntrySide::Debit)
        } else if self.credit_amount > Decimal::ZERO {
            Some(EntrySide::Credit)
        } else {
            None
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

/// Reference from a journal entry to the business document it records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReference {
    /// Document type, e.g. `contract`.
    pub reference_type: String,
    /// Document ID.
    pub reference_id: uuid::Uuid,
}

/// An unvalidated journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryDraft {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// Source document.
    pub reference: Option<EntryReference>,
    /// Declared header debit total.
    pub total_debit: Decimal,
    /// Declared header credit total.
    pub total_credit: Decimal,
    /// Lines in posting order.
    pub lines: Vec<JournalLineDraft>,
}

impl JournalEntryDraft {
    /// Creates a draft whose header totals are computed from the lines.
    #[must_use]
    pub fn from_lines(
        tenant_id: TenantId,
        entry_date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLineDraft>,
    ) -> Self {
        let total_debit = lines.iter().map(|l| l.debit_amount).sum();
        let total_credit = lines.iter().map(|l| l.credit_amount).sum();
        Self {
            tenant_id,
            entry_date,
            description: description.into(),
            reference: None,
            total_debit,
            total_credit,
            lines,
        }
    }

    /// Sets the source document reference.
    #[must_use]
    pub fn with_reference(mut self, reference_type: &str, reference_id: uuid::Uuid) -> Self {
        self.reference = Some(EntryReference {
            reference_type: reference_type.to_string(),
            reference_id,
        });
        self
    }
}

/// Journal entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryStatus {
    /// Saved but not affecting balances.
    Draft,
    /// Posted and immutable.
    Posted,
}

impl JournalEntryStatus {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
        }
    }
}

/// A persisted journal entry header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryRecord {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Human-readable number, unique per tenant.
    pub entry_number: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Header debit total.
    pub total_debit: Decimal,
    /// Header credit total.
    pub total_credit: Decimal,
    /// Status.
    pub status: JournalEntryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_sides() {
        let account = AccountId::new();
        assert_eq!(
            JournalLineDraft::debit(account, dec!(10), "d").side(),
            Some(EntrySide::Debit)
        );
        assert_eq!(
            JournalLineDraft::credit(account, dec!(10), "c").side(),
            Some(EntrySide::Credit)
        );
        assert_eq!(JournalLineDraft::debit(account, dec!(0), "z").side(), None);
    }

    #[test]
    fn test_signed_amount() {
        let account = AccountId::new();
        assert_eq!(
            JournalLineDraft::debit(account, dec!(12.5), "d").signed_amount(),
            dec!(12.5)
        );
        assert_eq!(
            JournalLineDraft::credit(account, dec!(12.5), "c").signed_amount(),
            dec!(-12.5)
        );
    }

    #[test]
    fn test_from_lines_computes_totals() {
        let draft = JournalEntryDraft::from_lines(
            TenantId::new(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "test",
            vec![
                JournalLineDraft::debit(AccountId::new(), dec!(1200.000), "d"),
                JournalLineDraft::credit(AccountId::new(), dec!(1200.000), "c"),
            ],
        );
        assert_eq!(draft.total_debit, dec!(1200.000));
        assert_eq!(draft.total_credit, dec!(1200.000));
        assert!(draft.reference.is_none());
    }
}
