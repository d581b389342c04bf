//! Rental contract types and input validation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use fleetledger_shared::types::{
    ContractId, CustomerId, JournalEntryId, Locale, TenantId, UserId, VehicleId,
};

/// Kind of rental contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Open rental.
    Rental,
    /// Daily rental.
    DailyRental,
    /// Weekly rental.
    WeeklyRental,
    /// Monthly rental.
    MonthlyRental,
    /// Yearly rental.
    YearlyRental,
    /// Rent-to-own.
    RentToOwn,
    /// Lease.
    Lease,
    /// Subscription.
    Subscription,
    /// Corporate fleet agreement.
    Corporate,
    /// Government agreement.
    Government,
}

impl ContractType {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rental => "rental",
            Self::DailyRental => "daily_rental",
            Self::WeeklyRental => "weekly_rental",
            Self::MonthlyRental => "monthly_rental",
            Self::YearlyRental => "yearly_rental",
            Self::RentToOwn => "rent_to_own",
            Self::Lease => "lease",
            Self::Subscription => "subscription",
            Self::Corporate => "corporate",
            Self::Government => "government",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Created, no posted revenue entry.
    Draft,
    /// Revenue entry posted.
    Active,
}

impl ContractStatus {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
        }
    }
}

/// Decimal places stored for money amounts (`NUMERIC(19, 3)`).
pub const MAX_AMOUNT_SCALE: u32 = 3;

/// Exclusive bound on the integer part of a money amount (`NUMERIC(19, 3)`).
const AMOUNT_INTEGER_LIMIT: i64 = 10_000_000_000_000_000;

fn check_amount(field: &'static str, amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount.normalize().scale() > MAX_AMOUNT_SCALE
        || amount.abs().trunc() >= Decimal::from(AMOUNT_INTEGER_LIMIT)
    {
        return Err(ValidationError::AmountOutOfRange { field, amount });
    }
    Ok(amount)
}

/// Contract input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An amount does not fit a ledger money column.
    #[error("{field} {amount} is out of range (at most 3 decimal places and 16 integer digits)")]
    AmountOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Rejected amount.
        amount: Decimal,
    },

    /// End date precedes start date.
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

/// Raw request to create a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContractInput {
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Customer.
    pub customer_id: Option<CustomerId>,
    /// Rented vehicle.
    pub vehicle_id: Option<VehicleId>,
    /// Contract type.
    pub contract_type: Option<ContractType>,
    /// Signing date; defaults to today.
    pub contract_date: Option<NaiveDate>,
    /// First rental day.
    pub start_date: Option<NaiveDate>,
    /// Last rental day.
    pub end_date: Option<NaiveDate>,
    /// Total contract amount.
    pub amount: Option<Decimal>,
    /// Monthly installment.
    pub monthly_amount: Option<Decimal>,
    /// Free-text description.
    pub description: Option<String>,
    /// Contract terms.
    pub terms: Option<String>,
    /// Creating user.
    pub created_by: Option<UserId>,
    /// The tenant's display language, supplied by the caller. Used for
    /// warnings and entry descriptions; `posting.default_locale` applies
    /// when absent.
    pub locale: Option<Locale>,
}

impl CreateContractInput {
    /// Validates required fields and the date range.
    ///
    /// # Errors
    ///
    /// Returns the first missing field, an amount the ledger cannot store,
    /// or an inverted date range.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedContract, ValidationError> {
        let tenant_id = self.tenant_id.ok_or(ValidationError::MissingField("tenant_id"))?;
        let customer_id = self
            .customer_id
            .ok_or(ValidationError::MissingField("customer_id"))?;
        let contract_type = self
            .contract_type
            .ok_or(ValidationError::MissingField("contract_type"))?;
        let start_date = self
            .start_date
            .ok_or(ValidationError::MissingField("start_date"))?;
        let end_date = self.end_date.ok_or(ValidationError::MissingField("end_date"))?;
        let amount = self.amount.ok_or(ValidationError::MissingField("amount"))?;
        let amount = check_amount("amount", amount)?;
        let monthly_amount = self
            .monthly_amount
            .map(|m| check_amount("monthly_amount", m))
            .transpose()?;

        if end_date < start_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(ValidatedContract {
            tenant_id,
            customer_id,
            vehicle_id: self.vehicle_id,
            contract_type,
            contract_date: self.contract_date.unwrap_or(today),
            start_date,
            end_date,
            amount,
            monthly_amount,
            description: self.description.clone().filter(|d| !d.trim().is_empty()),
            terms: self.terms.clone(),
            created_by: self.created_by,
        })
    }
}

/// Contract input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedContract {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Customer.
    pub customer_id: CustomerId,
    /// Rented vehicle.
    pub vehicle_id: Option<VehicleId>,
    /// Contract type.
    pub contract_type: ContractType,
    /// Signing date.
    pub contract_date: NaiveDate,
    /// First rental day.
    pub start_date: NaiveDate,
    /// Last rental day.
    pub end_date: NaiveDate,
    /// Total contract amount.
    pub amount: Decimal,
    /// Monthly installment.
    pub monthly_amount: Option<Decimal>,
    /// Description.
    pub description: Option<String>,
    /// Terms.
    pub terms: Option<String>,
    /// Creating user.
    pub created_by: Option<UserId>,
}

impl ValidatedContract {
    /// Builds the insert payload for a given contract number.
    #[must_use]
    pub fn to_new_contract(&self, contract_number: String) -> NewContract {
        NewContract {
            contract_number,
            contract: self.clone(),
        }
    }
}

/// Insert payload for a draft contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContract {
    /// Generated contract number.
    pub contract_number: String,
    /// Validated contract fields.
    pub contract: ValidatedContract,
}

/// A persisted contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Contract ID.
    pub id: ContractId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Contract number, unique per tenant.
    pub contract_number: String,
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
    pub amount: Decimal,
    /// Description.
    pub description: Option<String>,
    /// Status.
    pub status: ContractStatus,
    /// Linked revenue entry.
    pub journal_entry_id: Option<JournalEntryId>,
    /// Set when the revenue entry must be booked by hand.
    pub requires_manual_entry: bool,
    /// Why automatic posting failed.
    pub posting_error: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_input() -> CreateContractInput {
        CreateContractInput {
            tenant_id: Some(TenantId::new()),
            customer_id: Some(CustomerId::new()),
            contract_type: Some(ContractType::MonthlyRental),
            start_date: Some(date(2026, 2, 1)),
            end_date: Some(date(2026, 2, 28)),
            amount: Some(dec!(1200.000)),
            ..CreateContractInput::default()
        }
    }

    #[test]
    fn test_valid_input_defaults_contract_date() {
        let validated = valid_input().validate(date(2026, 1, 20)).unwrap();
        assert_eq!(validated.contract_date, date(2026, 1, 20));
        assert_eq!(validated.amount, dec!(1200.000));
    }

    #[test]
    fn test_missing_fields() {
        let mut input = valid_input();
        input.customer_id = None;
        assert_eq!(
            input.validate(date(2026, 1, 1)),
            Err(ValidationError::MissingField("customer_id"))
        );

        let mut input = valid_input();
        input.amount = None;
        assert_eq!(
            input.validate(date(2026, 1, 1)),
            Err(ValidationError::MissingField("amount"))
        );
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let mut input = valid_input();
        input.end_date = Some(date(2026, 1, 31));
        assert!(matches!(
            input.validate(date(2026, 1, 1)),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_amounts_must_fit_money_columns() {
        let mut input = valid_input();
        input.amount = Some(dec!(10000000000000000));
        assert_eq!(
            input.validate(date(2026, 1, 1)),
            Err(ValidationError::AmountOutOfRange {
                field: "amount",
                amount: dec!(10000000000000000),
            })
        );

        let mut input = valid_input();
        input.amount = Some(dec!(9999999999999999.999));
        assert!(input.validate(date(2026, 1, 1)).is_ok());

        let mut input = valid_input();
        input.amount = Some(dec!(12.3456));
        assert!(matches!(
            input.validate(date(2026, 1, 1)),
            Err(ValidationError::AmountOutOfRange { field: "amount", .. })
        ));

        let mut input = valid_input();
        input.amount = Some(dec!(1.50000));
        assert!(input.validate(date(2026, 1, 1)).is_ok());

        let mut input = valid_input();
        input.monthly_amount = Some(dec!(-10000000000000000));
        assert!(matches!(
            input.validate(date(2026, 1, 1)),
            Err(ValidationError::AmountOutOfRange { field: "monthly_amount", .. })
        ));
    }

    #[test]
    fn test_same_day_contract_allowed() {
        let mut input = valid_input();
        input.end_date = input.start_date;
        assert!(input.validate(date(2026, 1, 1)).is_ok());
    }

    #[test]
    fn test_blank_description_dropped() {
        let mut input = valid_input();
        input.description = Some("   ".to_string());
        let validated = input.validate(date(2026, 1, 1)).unwrap();
        assert!(validated.description.is_none());
    }

    #[test]
    fn test_contract_type_wire_format() {
        let json = serde_json::to_string(&ContractType::RentToOwn).unwrap();
        assert_eq!(json, "\"rent_to_own\"");
        assert_eq!(ContractType::DailyRental.to_string(), "daily_rental");
    }
}
