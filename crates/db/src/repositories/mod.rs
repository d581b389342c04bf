//! Repository implementations of the posting store ports.
//!
//! Repositories hide the `SeaORM` details from the posting core, which only
//! sees the traits in `fleetledger_core::posting::store`.

pub mod posting;
pub mod procedure;

pub use posting::{SeaOrmPostingStore, store_error};
pub use procedure::PgContractProcedure;
