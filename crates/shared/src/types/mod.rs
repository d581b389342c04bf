//! Common types used across the workspace.

pub mod id;
pub mod locale;

pub use id::*;
pub use locale::Locale;
