//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `STYLEFORGE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use styleforge::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod bandit;
mod cache;
mod error;
mod learning;
mod renderer;
mod specificity;

pub use bandit::BanditConfig;
pub use cache::CacheConfig;
pub use error::ConfigError;
pub use learning::LearningConfig;
pub use renderer::RendererConfig;
pub use specificity::SpecificityConfig;

use serde::Deserialize;

/// Root engine configuration
///
/// Every section has working defaults, so an empty environment yields a
/// valid configuration. Load using [`EngineConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Bandit model tuning (shards, decay, exploration noise)
    #[serde(default)]
    pub bandit: BanditConfig,

    /// Specificity analyzer temperature range
    #[serde(default)]
    pub specificity: SpecificityConfig,

    /// Prompt cache capacity and temperature bucketing
    #[serde(default)]
    pub cache: CacheConfig,

    /// Prompt renderer token budget
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Feedback learning weights and decision retention
    #[serde(default)]
    pub learning: LearningConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `STYLEFORGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `STYLEFORGE__CACHE__CAPACITY=500` -> `cache.capacity = 500`
    /// - `STYLEFORGE__BANDIT__DECAY_FACTOR=0.85` -> `bandit.decay_factor = 0.85`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STYLEFORGE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bandit.validate()?;
        self.specificity.validate()?;
        self.cache.validate()?;
        self.renderer.validate()?;
        self.learning.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }
}
