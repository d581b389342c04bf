//! `SeaORM` Entity for account_mappings table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub role_code: String,
    pub ledger_account_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chart_of_accounts::Entity",
        from = "Column::LedgerAccountId",
        to = "super::chart_of_accounts::Column::Id"
    )]
    ChartOfAccounts,
    #[sea_orm(
        belongs_to = "super::account_role_types::Entity",
        from = "Column::RoleCode",
        to = "super::account_role_types::Column::Code"
    )]
    AccountRoleTypes,
}

impl Related<super::chart_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartOfAccounts.def()
    }
}

impl Related<super::account_role_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountRoleTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
