//! `SeaORM` Entity for account_role_types table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountClassification;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_role_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub name_ar: String,
    pub classification: AccountClassification,
    pub default_account_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_mappings::Entity")]
    AccountMappings,
}

impl Related<super::account_mappings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountMappings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
