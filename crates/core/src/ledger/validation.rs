//! Business rule validation for journal entries.

use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::{JournalEntryDraft, JournalLineDraft};

/// Validation errors for journal entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerValidationError {
    /// Entry lines do not balance.
    #[error("Entry is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Entry has no lines.
    #[error("Entry must have at least one line")]
    NoEntries,

    /// Entry has only one side (all debits or all credits).
    #[error("Entry must have both debit and credit lines")]
    SingleSided,

    /// Line amount is zero or negative.
    #[error("Line {line} amount must be positive")]
    InvalidAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Line carries both a debit and a credit.
    #[error("Line {line} must be either a debit or a credit, not both")]
    BothSides {
        /// 1-based line number.
        line: usize,
    },

    /// Header totals disagree with the line sums.
    #[error(
        "Header totals ({header_debit}/{header_credit}) do not match line sums ({line_debit}/{line_credit})"
    )]
    TotalsMismatch {
        /// Declared header debit.
        header_debit: Decimal,
        /// Declared header credit.
        header_credit: Decimal,
        /// Sum of line debits.
        line_debit: Decimal,
        /// Sum of line credits.
        line_credit: Decimal,
    },
}

/// A journal entry that passed validation.
///
/// Only [`validate_entry`] constructs this type, so stores accepting it can
/// rely on the entry being balanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedEntry {
    draft: JournalEntryDraft,
}

impl BalancedEntry {
    /// Returns the validated draft.
    #[must_use]
    pub const fn draft(&self) -> &JournalEntryDraft {
        &self.draft
    }

    /// Returns the lines in posting order.
    #[must_use]
    pub fn lines(&self) -> &[JournalLineDraft] {
        &self.draft.lines
    }

    /// Returns the balanced total (debits == credits).
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.draft.total_debit
    }
}

/// Validates that a journal entry is balanced and well formed.
///
/// # Errors
///
/// Returns an error if the lines are not balanced, a line is malformed, or
/// the header totals disagree with the lines.
pub fn validate_entry(draft: JournalEntryDraft) -> Result<BalancedEntry, LedgerValidationError> {
    if draft.lines.is_empty() {
        return Err(LedgerValidationError::NoEntries);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for (idx, line) in draft.lines.iter().enumerate() {
        let line_no = idx + 1;
        if line.debit_amount < Decimal::ZERO || line.credit_amount < Decimal::ZERO {
            return Err(LedgerValidationError::InvalidAmount { line: line_no });
        }
        match (line.debit_amount > Decimal::ZERO, line.credit_amount > Decimal::ZERO) {
            (true, true) => return Err(LedgerValidationError::BothSides { line: line_no }),
            (false, false) => return Err(LedgerValidationError::InvalidAmount { line: line_no }),
            (true, false) => {
                total_debits += line.debit_amount;
                has_debit = true;
            }
            (false, true) => {
                total_credits += line.credit_amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerValidationError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(LedgerValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    if draft.total_debit != total_debits || draft.total_credit != total_credits {
        return Err(LedgerValidationError::TotalsMismatch {
            header_debit: draft.total_debit,
            header_credit: draft.total_credit,
            line_debit: total_debits,
            line_credit: total_credits,
        });
    }

    Ok(BalancedEntry { draft })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use fleetledger_shared::types::{AccountId, TenantId};

    fn make_draft(lines: Vec<JournalLineDraft>) -> JournalEntryDraft {
        JournalEntryDraft::from_lines(
            TenantId::new(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            "test",
            lines,
        )
    }

    #[test]
    fn test_balanced_entry() {
        let draft = make_draft(vec![
            JournalLineDraft::debit(AccountId::new(), dec!(100.00), "d"),
            JournalLineDraft::credit(AccountId::new(), dec!(100.00), "c"),
        ]);
        let balanced = validate_entry(draft).unwrap();
        assert_eq!(balanced.total(), dec!(100.00));
        assert_eq!(balanced.lines().len(), 2);
    }

    #[test]
    fn test_unbalanced_entry() {
        let draft = make_draft(vec![
            JournalLineDraft::debit(AccountId::new(), dec!(100.00), "d"),
            JournalLineDraft::credit(AccountId::new(), dec!(50.00), "c"),
        ]);
        assert!(matches!(
            validate_entry(draft),
            Err(LedgerValidationError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_no_entries() {
        assert_eq!(
            validate_entry(make_draft(vec![])),
            Err(LedgerValidationError::NoEntries)
        );
    }

    #[test]
    fn test_single_sided() {
        let draft = make_draft(vec![
            JournalLineDraft::debit(AccountId::new(), dec!(10), "a"),
            JournalLineDraft::debit(AccountId::new(), dec!(10), "b"),
        ]);
        assert_eq!(validate_entry(draft), Err(LedgerValidationError::SingleSided));
    }

    #[test]
    fn test_zero_line_rejected() {
        let draft = make_draft(vec![
            JournalLineDraft::debit(AccountId::new(), dec!(10), "a"),
            JournalLineDraft::credit(AccountId::new(), dec!(10), "b"),
            JournalLineDraft::credit(AccountId::new(), dec!(0), "zero"),
        ]);
        assert_eq!(
            validate_entry(draft),
            Err(LedgerValidationError::InvalidAmount { line: 3 })
        );
    }

    #[test]
    fn test_negative_line_rejected() {
        let draft = make_draft(vec![
            JournalLineDraft::debit(AccountId::new(), dec!(-10), "a"),
            JournalLineDraft::credit(AccountId::new(), dec!(-10), "b"),
        ]);
        assert_eq!(
            validate_entry(draft),
            Err(LedgerValidationError::InvalidAmount { line: 1 })
        );
    }

    #[test]
    fn test_both_sides_rejected() {
        let mut line = JournalLineDraft::debit(AccountId::new(), dec!(10), "a");
        line.credit_amount = dec!(10);
        let draft = make_draft(vec![
            line,
            JournalLineDraft::credit(AccountId::new(), dec!(10), "b"),
        ]);
        assert_eq!(
            validate_entry(draft),
            Err(LedgerValidationError::BothSides { line: 1 })
        );
    }

    #[test]
    fn test_header_mismatch_rejected() {
        let mut draft = make_draft(vec![
            JournalLineDraft::debit(AccountId::new(), dec!(10), "a"),
            JournalLineDraft::credit(AccountId::new(), dec!(10), "b"),
        ]);
        draft.total_debit = dec!(20);
        draft.total_credit = dec!(20);
        assert!(matches!(
            validate_entry(draft),
            Err(LedgerValidationError::TotalsMismatch { .. })
        ));
    }
}
