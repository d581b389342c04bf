//! Core business logic for FleetLedger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the async ports in [`posting::store`].
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping types and validation
//! - `posting` - Contract revenue posting: roles, resolution, numbering, orchestration

pub mod ledger;
pub mod posting;
