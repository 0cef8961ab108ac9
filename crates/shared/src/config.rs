//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
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

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Local currency units (NIO) per one foreign unit (USD).
    ///
    /// Read as a string (`"36.7"`) so no float ever touches the rate.
    #[serde(
        default = "default_exchange_rate",
        with = "rust_decimal::serde::str"
    )]
    pub exchange_rate: Decimal,
}

fn default_exchange_rate() -> Decimal {
    Decimal::new(367, 1)
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            exchange_rate: default_exchange_rate(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `CAJA__*` environment variables (e.g. `CAJA__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CAJA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("CAJA__DATABASE__URL", Some("sqlite::memory:")),
                ("CAJA__DATABASE__MAX_CONNECTIONS", Some("4")),
                ("CAJA__LEDGER__EXCHANGE_RATE", Some("36.6243")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(config.ledger.exchange_rate, dec!(36.6243));
            },
        );
    }

    #[test]
    fn test_ledger_defaults() {
        temp_env::with_vars(
            [
                ("CAJA__DATABASE__URL", Some("sqlite::memory:")),
                ("CAJA__LEDGER__EXCHANGE_RATE", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.exchange_rate, dec!(36.7));
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_var_unset("CAJA__DATABASE__URL", || {
            assert!(AppConfig::load().is_err());
        });
    }
}
