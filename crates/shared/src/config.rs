//! Application configuration management.

use serde::Deserialize;

use crate::types::Locale;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Posting configuration.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Contract revenue posting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostingConfig {
    /// Prefix for journal entry numbers (`JE-20261017-0001`).
    #[serde(default = "default_entry_prefix")]
    pub entry_prefix: String,
    /// Prefix for contract numbers (`CON-26-0001`).
    #[serde(default = "default_contract_prefix")]
    pub contract_prefix: String,
    /// Code of the cost center attached to both entry lines when it exists.
    #[serde(default = "default_cost_center_code")]
    pub cost_center_code: String,
    /// How many numbers to try before giving up on a uniqueness collision.
    #[serde(default = "default_max_number_attempts")]
    pub max_number_attempts: u32,
    /// Language for warnings when the tenant does not specify one.
    #[serde(default)]
    pub default_locale: Locale,
}

fn default_entry_prefix() -> String {
    "JE".to_string()
}

fn default_contract_prefix() -> String {
    "CON".to_string()
}

fn default_cost_center_code() -> String {
    "SALES".to_string()
}

fn default_max_number_attempts() -> u32 {
    5
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            entry_prefix: default_entry_prefix(),
            contract_prefix: default_contract_prefix(),
            cost_center_code: default_cost_center_code(),
            max_number_attempts: default_max_number_attempts(),
            default_locale: Locale::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FLEETLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
