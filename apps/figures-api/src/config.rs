//! Figures API configuration module.
//!
//! Configuration is layered with the `config` crate, later sources winning:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`figures.toml`, or the path in `FIGURES_CONFIG`)
//! 3. Environment variables, e.g. `FIGURES__HTTP_PORT=9000` or
//!    `FIGURES__INVENTORY__BACKEND=redis`
//!
//! ## Example `figures.toml`
//! ```toml
//! http_port = 8080
//! database_path = "figures.db"
//!
//! [inventory]
//! backend = "sqlite"
//! provision_on_start = true
//!
//! [inventory.initial_stock]
//! Circle = 5
//! Square = 20
//!
//! [reservation]
//! timeout_ms = 2000
//! max_attempts = 5
//!
//! [pricing]
//! Square = 1.1
//! ```

use std::collections::HashMap;
use std::env;

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use figures_core::{FigureKind, PricingTable};
use figures_store::redis_store::DEFAULT_KEY_PREFIX;
use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "figures.toml";

/// Which inventory backend serves reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryBackend {
    /// Process-local; stock is lost on restart.
    Memory,
    /// SQLite file at `database_path`.
    Sqlite,
    /// Redis at `redis_url`, shared across instances.
    Redis,
}

/// `[inventory]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    pub backend: InventoryBackend,

    /// Whether to apply `initial_stock` at startup.
    pub provision_on_start: bool,

    /// Absolute counts per kind name.
    #[serde(default)]
    pub initial_stock: HashMap<String, i64>,
}

/// `[reservation]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationConfig {
    /// Deadline for one batch reservation.
    pub timeout_ms: u64,

    /// SQLite attempts on BUSY/LOCKED.
    pub max_attempts: u32,
}

/// Figures API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file (sqlite backend, and order storage)
    pub database_path: String,

    /// Redis connection string (required for the redis backend)
    pub redis_url: Option<String>,

    /// Key prefix for Redis inventory counters
    pub redis_key_prefix: String,

    pub inventory: InventoryConfig,

    pub reservation: ReservationConfig,

    /// Multiplier overrides per kind name; unnamed kinds keep defaults.
    #[serde(default)]
    pub pricing: HashMap<String, f64>,
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("FIGURES_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config: AppConfig = defaults()?
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("FIGURES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults plus a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field rules the types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.backend == InventoryBackend::Redis && self.redis_url.is_none() {
            return Err(ConfigError::MissingRequired("redis_url".to_string()));
        }

        if self.reservation.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "reservation.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.reservation.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "reservation.timeout_ms must be at least 1".to_string(),
            ));
        }

        self.initial_stock()?;
        self.pricing_table()?;
        Ok(())
    }

    /// Initial stock as typed `(kind, count)` pairs.
    pub fn initial_stock(&self) -> Result<Vec<(FigureKind, i64)>, ConfigError> {
        let mut stock = Vec::with_capacity(self.inventory.initial_stock.len());

        for (name, count) in &self.inventory.initial_stock {
            let kind = parse_kind("inventory.initial_stock", name)?;
            if *count < 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "inventory.initial_stock.{name} must not be negative"
                )));
            }
            stock.push((kind, *count));
        }

        stock.sort_by_key(|(kind, _)| *kind);
        Ok(stock)
    }

    /// Default multipliers with configured overrides applied.
    pub fn pricing_table(&self) -> Result<PricingTable, ConfigError> {
        let defaults = PricingTable::default();

        let mut rules: Vec<(FigureKind, f64)> = FigureKind::ALL
            .into_iter()
            .filter_map(|kind| defaults.multiplier(kind).map(|m| (kind, m)))
            .collect();

        for (name, multiplier) in &self.pricing {
            let kind = parse_kind("pricing", name)?;
            match rules.iter_mut().find(|(k, _)| *k == kind) {
                Some(rule) => rule.1 = *multiplier,
                None => rules.push((kind, *multiplier)),
            }
        }

        PricingTable::with_rules(rules).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("http_port", 8080)?
        .set_default("database_path", "figures.db")?
        .set_default("redis_key_prefix", DEFAULT_KEY_PREFIX)?
        .set_default("inventory.backend", "sqlite")?
        .set_default("inventory.provision_on_start", false)?
        .set_default("reservation.timeout_ms", 2000)?
        .set_default("reservation.max_attempts", 5)?)
}

fn parse_kind(section: &str, name: &str) -> Result<FigureKind, ConfigError> {
    FigureKind::parse(Some(name))
        .map_err(|_| ConfigError::InvalidValue(format!("{section}: unknown figure kind '{name}'")))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_path, "figures.db");
        assert_eq!(config.redis_key_prefix, "figures:stock:");
        assert_eq!(config.inventory.backend, InventoryBackend::Sqlite);
        assert!(!config.inventory.provision_on_start);
        assert_eq!(config.reservation.timeout_ms, 2000);
        assert_eq!(config.reservation.max_attempts, 5);
        assert_eq!(config.pricing_table().unwrap(), PricingTable::default());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            http_port = 9000

            [inventory]
            backend = "memory"
            provision_on_start = true

            [inventory.initial_stock]
            circle = 5
            Square = 20

            [pricing]
            Square = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.http_port, 9000);
        assert_eq!(config.inventory.backend, InventoryBackend::Memory);
        assert_eq!(
            config.initial_stock().unwrap(),
            vec![(FigureKind::Square, 20), (FigureKind::Circle, 5)]
        );

        let pricing = config.pricing_table().unwrap();
        assert_eq!(pricing.multiplier(FigureKind::Square), Some(1.5));
        assert_eq!(pricing.multiplier(FigureKind::Circle), Some(0.9));
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(
            AppConfig::from_toml("[inventory]\nbackend = \"redis\""),
            Err(ConfigError::MissingRequired(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[inventory]\nbackend = \"postgres\""),
            Err(ConfigError::Load(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[reservation]\nmax_attempts = 0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[inventory.initial_stock]\nCircle = -1"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[inventory.initial_stock]\nHexagon = 1"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[pricing]\nCircle = -0.5"),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
