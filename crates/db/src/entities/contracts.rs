//! `SeaORM` Entity for contracts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ContractStatus, ContractType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub contract_number: String,
    pub customer_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub contract_type: ContractType,
    pub contract_date: Date,
    pub start_date: Date,
    pub end_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 3)))")]
    pub contract_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 3)))", nullable)]
    pub monthly_amount: Option<Decimal>,
    pub description: Option<String>,
    pub terms: Option<String>,
    pub status: ContractStatus,
    pub journal_entry_id: Option<Uuid>,
    pub requires_manual_entry: bool,
    pub posting_error: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
