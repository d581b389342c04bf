//! `SeaORM` entity definitions.

pub mod account_mappings;
pub mod account_role_types;
pub mod chart_of_accounts;
pub mod contracts;
pub mod cost_centers;
pub mod document_sequences;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod sea_orm_active_enums;
