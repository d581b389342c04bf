//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use fleetledger_core::ledger::{
    AccountClassification as CoreClassification, JournalEntryStatus as CoreEntryStatus,
};
use fleetledger_core::posting::{
    ContractStatus as CoreContractStatus, ContractType as CoreContractType,
};
use serde::{Deserialize, Serialize};

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_classification")]
#[serde(rename_all = "lowercase")]
pub enum AccountClassification {
    /// Asset.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Journal entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_status")]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryStatus {
    /// Draft.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted.
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// Contract status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_status")]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Draft.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Active.
    #[sea_orm(string_value = "active")]
    Active,
}

/// Contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_type")]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Rental.
    #[sea_orm(string_value = "rental")]
    Rental,
    /// Daily rental.
    #[sea_orm(string_value = "daily_rental")]
    DailyRental,
    /// Weekly rental.
    #[sea_orm(string_value = "weekly_rental")]
    WeeklyRental,
    /// Monthly rental.
    #[sea_orm(string_value = "monthly_rental")]
    MonthlyRental,
    /// Yearly rental.
    #[sea_orm(string_value = "yearly_rental")]
    YearlyRental,
    /// Rent-to-own.
    #[sea_orm(string_value = "rent_to_own")]
    RentToOwn,
    /// Lease.
    #[sea_orm(string_value = "lease")]
    Lease,
    /// Subscription.
    #[sea_orm(string_value = "subscription")]
    Subscription,
    /// Corporate.
    #[sea_orm(string_value = "corporate")]
    Corporate,
    /// Government.
    #[sea_orm(string_value = "government")]
    Government,
}

/// Maps variants one-to-one between a core enum and its database twin.
macro_rules! mirror_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountClassification <=> CoreClassification {
    Asset, Liability, Equity, Revenue, Expense,
});

mirror_enum!(JournalEntryStatus <=> CoreEntryStatus {
    Draft, Posted,
});

mirror_enum!(ContractStatus <=> CoreContractStatus {
    Draft, Active,
});

mirror_enum!(ContractType <=> CoreContractType {
    Rental, DailyRental, WeeklyRental, MonthlyRental, YearlyRental,
    RentToOwn, Lease, Subscription, Corporate, Government,
});
