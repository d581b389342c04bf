//! Account role registry.
//!
//! Roles name what an account is *for* (receivables, rental revenue) without
//! naming a concrete account. Each tenant maps roles to its own chart of
//! accounts; the registry supplies the defaults used when provisioning.

use serde::{Deserialize, Serialize};

use crate::ledger::AccountClassification;

/// Semantic account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    /// Amounts owed by customers.
    Receivables,
    /// Generic revenue.
    Revenue,
    /// Revenue from vehicle rentals.
    RentalRevenue,
    /// Revenue from vehicle sales.
    SalesRevenue,
}

impl AccountRole {
    /// Returns the stable role code stored in mappings.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Receivables => "RECEIVABLES",
            Self::Revenue => "REVENUE",
            Self::RentalRevenue => "RENTAL_REVENUE",
            Self::SalesRevenue => "SALES_REVENUE",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountRoleRegistry::lookup(s)
            .map(|def| def.role)
            .ok_or_else(|| format!("Unknown account role: {s}"))
    }
}

/// Revenue roles in the order the poster tries them.
pub const REVENUE_ROLE_PRIORITY: [AccountRole; 3] = [
    AccountRole::RentalRevenue,
    AccountRole::Revenue,
    AccountRole::SalesRevenue,
];

/// Default account attributes for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDefinition {
    /// The role.
    pub role: AccountRole,
    /// Account code used when provisioning.
    pub default_code: &'static str,
    /// English account name.
    pub name_en: &'static str,
    /// Arabic account name.
    pub name_ar: &'static str,
    /// Required classification of any account serving this role.
    pub classification: AccountClassification,
}

const DEFINITIONS: [RoleDefinition; 4] = [
    RoleDefinition {
        role: AccountRole::Receivables,
        default_code: "1130",
        name_en: "Accounts Receivable",
        name_ar: "الذمم المدينة",
        classification: AccountClassification::Asset,
    },
    RoleDefinition {
        role: AccountRole::Revenue,
        default_code: "4100",
        name_en: "Revenue",
        name_ar: "الإيرادات",
        classification: AccountClassification::Revenue,
    },
    RoleDefinition {
        role: AccountRole::RentalRevenue,
        default_code: "4110",
        name_en: "Rental Revenue",
        name_ar: "إيرادات الإيجار",
        classification: AccountClassification::Revenue,
    },
    RoleDefinition {
        role: AccountRole::SalesRevenue,
        default_code: "4120",
        name_en: "Sales Revenue",
        name_ar: "إيرادات المبيعات",
        classification: AccountClassification::Revenue,
    },
];

/// Static catalog of account roles.
pub struct AccountRoleRegistry;

impl AccountRoleRegistry {
    /// Returns the definition for a role.
    #[must_use]
    pub const fn definition(role: AccountRole) -> &'static RoleDefinition {
        match role {
            AccountRole::Receivables => &DEFINITIONS[0],
            AccountRole::Revenue => &DEFINITIONS[1],
            AccountRole::RentalRevenue => &DEFINITIONS[2],
            AccountRole::SalesRevenue => &DEFINITIONS[3],
        }
    }

    /// Returns every role definition.
    #[must_use]
    pub const fn all() -> &'static [RoleDefinition] {
        &DEFINITIONS
    }

    /// Finds a definition by role code, case-insensitively.
    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static RoleDefinition> {
        DEFINITIONS
            .iter()
            .find(|def| def.role.code().eq_ignore_ascii_case(code.trim()))
    }
}
