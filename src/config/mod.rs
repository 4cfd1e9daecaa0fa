//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `VOTE_VISION` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use vote_vision::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//!
//! println!("Storing polls in {}", config.storage.data_dir.display());
//! ```

mod error;
mod logging;
mod ranking;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use ranking::RankingConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Persistence adapter selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ranking engine settings
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `VOTE_VISION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    /// 5. Validates the result
    ///
    /// # Environment Variable Format
    ///
    /// - `VOTE_VISION__STORAGE__BACKEND=memory` -> `storage.backend = memory`
    /// - `VOTE_VISION__RANKING__FEATURED_SEED=42` -> `ranking.featured_seed = 42`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` if values cannot be parsed into expected
    /// types, or `ConfigError::ValidationFailed` if they parse but are invalid
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VOTE_VISION")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
