//! Property-based tests for journal entry validation rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use fleetledger_shared::types::{AccountId, TenantId};

use super::entry::{EntrySide, JournalEntryDraft, JournalLineDraft};
use super::validation::{LedgerValidationError, validate_entry};

/// Strategy to generate a valid positive amount with three decimal places.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.001 to 1,000,000.000
    (1i64..1_000_000_000i64).prop_map(|mils| Decimal::new(mils, 3))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|mils| Decimal::new(-mils, 3))
}

fn side_strategy() -> impl Strategy<Value = EntrySide> {
    prop_oneof![Just(EntrySide::Debit), Just(EntrySide::Credit)]
}

fn make_line(side: EntrySide, amount: Decimal) -> JournalLineDraft {
    match side {
        EntrySide::Debit => JournalLineDraft::debit(AccountId::new(), amount, "line"),
        EntrySide::Credit => JournalLineDraft::credit(AccountId::new(), amount, "line"),
    }
}

fn opposite(side: EntrySide) -> EntrySide {
    match side {
        EntrySide::Debit => EntrySide::Credit,
        EntrySide::Credit => EntrySide::Debit,
    }
}

fn make_draft(lines: Vec<JournalLineDraft>) -> JournalEntryDraft {
    JournalEntryDraft::from_lines(
        TenantId::new(),
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        "prop",
        lines,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A zero-amount line is rejected wherever it appears.
    #[test]
    fn prop_zero_amount_rejected(
        side in side_strategy(),
        other_amount in positive_amount(),
    ) {
        let draft = make_draft(vec![
            make_line(side, Decimal::ZERO),
            make_line(opposite(side), other_amount),
        ]);

        let result = validate_entry(draft);
        prop_assert!(
            matches!(result, Err(LedgerValidationError::InvalidAmount { line: 1 })),
            "Zero amount should be rejected, got: {:?}",
            result
        );
    }

    /// A negative-amount line is rejected.
    #[test]
    fn prop_negative_amount_rejected(
        side in side_strategy(),
        neg_amount in negative_amount(),
        other_amount in positive_amount(),
    ) {
        let draft = make_draft(vec![
            make_line(opposite(side), other_amount),
            make_line(side, neg_amount),
        ]);

        let result = validate_entry(draft);
        prop_assert!(
            matches!(result, Err(LedgerValidationError::InvalidAmount { line: 2 })),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// A single line can never balance.
    #[test]
    fn prop_single_line_rejected(
        side in side_strategy(),
        amount in positive_amount(),
    ) {
        let result = validate_entry(make_draft(vec![make_line(side, amount)]));
        prop_assert!(
            matches!(result, Err(LedgerValidationError::SingleSided)),
            "Single line should be rejected as single-sided, got: {:?}",
            result
        );
    }

    /// The two-line contract revenue shape is always accepted and keeps its total.
    #[test]
    fn prop_two_line_entry_accepted(amount in positive_amount()) {
        let draft = make_draft(vec![
            make_line(EntrySide::Debit, amount),
            make_line(EntrySide::Credit, amount),
        ]);

        let balanced = validate_entry(draft);
        prop_assert!(balanced.is_ok(), "got: {:?}", balanced);
        let balanced = balanced.unwrap();
        prop_assert_eq!(balanced.total(), amount);
        prop_assert_eq!(balanced.draft().total_credit, amount);
    }

    /// Split debits against one credit are accepted when they sum up.
    #[test]
    fn prop_multi_line_balanced_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let draft = make_draft(vec![
            make_line(EntrySide::Debit, amount1),
            make_line(EntrySide::Debit, amount2),
            make_line(EntrySide::Credit, amount1 + amount2),
        ]);

        prop_assert!(validate_entry(draft).is_ok());
    }

    /// Any difference between the sides is reported as unbalanced.
    #[test]
    fn prop_unequal_sides_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let draft = make_draft(vec![
            make_line(EntrySide::Debit, debit),
            make_line(EntrySide::Credit, credit),
        ]);

        let result = validate_entry(draft);
        prop_assert_eq!(
            result,
            Err(LedgerValidationError::Unbalanced { debits: debit, credits: credit })
        );
    }
}
