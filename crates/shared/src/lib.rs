//! Shared types, errors, and configuration for FleetLedger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Tenant display language
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, PostingConfig};
pub use error::{AppError, AppResult};
