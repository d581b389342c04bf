//! Chart of accounts domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use fleetledger_shared::types::{AccountId, TenantId};

use super::entry::EntrySide;

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountClassification {
    /// Assets (receivables, cash, vehicles).
    Asset,
    /// Liabilities.
    Liability,
    /// Owner's equity.
    Equity,
    /// Revenue.
    Revenue,
    /// Expenses.
    Expense,
}

impl AccountClassification {
    /// Returns the side on which this classification's balance increases.
    ///
    /// - Asset/Expense: debit-normal
    /// - Liability/Equity/Revenue: credit-normal
    #[must_use]
    pub const fn normal_balance(self) -> EntrySide {
        match self {
            Self::Asset | Self::Expense => EntrySide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => EntrySide::Credit,
        }
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" => Ok(Self::Asset),
            "liability" | "liabilities" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" | "revenues" => Ok(Self::Revenue),
            "expense" | "expenses" => Ok(Self::Expense),
            _ => Err(format!("Unknown account classification: {s}")),
        }
    }
}

/// A ledger account belonging to one tenant's chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Account ID.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Account code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Arabic display name.
    pub name_ar: Option<String>,
    /// Classification.
    pub classification: AccountClassification,
    /// Header accounts group children and never receive postings.
    pub is_header: bool,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the account was created automatically for an unmapped role.
    pub auto_provisioned: bool,
    /// Creation timestamp; the oldest matching account wins reuse.
    pub created_at: DateTime<Utc>,
}

impl LedgerAccount {
    /// Returns the account's natural balance side.
    #[must_use]
    pub const fn normal_balance(&self) -> EntrySide {
        self.classification.normal_balance()
    }

    /// Returns true if journal lines may be posted to this account.
    #[must_use]
    pub const fn is_postable(&self) -> bool {
        self.is_active && !self.is_header
    }
}

/// Input for creating a ledger account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerAccount {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Arabic display name.
    pub name_ar: Option<String>,
    /// Classification.
    pub classification: AccountClassification,
    /// Role code the account was provisioned for, kept for audit.
    pub provisioned_for_role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn make_account(is_active: bool, is_header: bool) -> LedgerAccount {
        LedgerAccount {
            id: AccountId::new(),
            tenant_id: TenantId::new(),
            code: "1130".to_string(),
            name: "Accounts Receivable".to_string(),
            name_ar: None,
            classification: AccountClassification::Asset,
            is_header,
            is_active,
            auto_provisioned: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_normal_balance() {
        assert_eq!(AccountClassification::Asset.normal_balance(), EntrySide::Debit);
        assert_eq!(AccountClassification::Expense.normal_balance(), EntrySide::Debit);
        assert_eq!(AccountClassification::Liability.normal_balance(), EntrySide::Credit);
        assert_eq!(AccountClassification::Equity.normal_balance(), EntrySide::Credit);
        assert_eq!(AccountClassification::Revenue.normal_balance(), EntrySide::Credit);
    }

    #[test]
    fn test_classification_from_str_accepts_plurals() {
        assert_eq!(
            AccountClassification::from_str("assets").unwrap(),
            AccountClassification::Asset
        );
        assert_eq!(
            AccountClassification::from_str("Revenue").unwrap(),
            AccountClassification::Revenue
        );
        assert!(AccountClassification::from_str("income").is_err());
    }

    #[test]
    fn test_classification_round_trips_through_display() {
        for classification in [
            AccountClassification::Asset,
            AccountClassification::Liability,
            AccountClassification::Equity,
            AccountClassification::Revenue,
            AccountClassification::Expense,
        ] {
            let parsed = AccountClassification::from_str(&classification.to_string()).unwrap();
            assert_eq!(parsed, classification);
        }
    }

    #[test]
    fn test_postable_accounts() {
        assert!(make_account(true, false).is_postable());
        assert!(!make_account(false, false).is_postable());
        assert!(!make_account(true, true).is_postable());
        assert_eq!(make_account(true, false).normal_balance(), EntrySide::Debit);
    }
}
