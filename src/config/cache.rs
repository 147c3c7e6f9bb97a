//! Prompt cache configuration

use serde::Deserialize;

use crate::domain::foundation::ValidationError;

/// Prompt cache sizing and fingerprint bucketing
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of ready entries before LRU eviction
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Width of the temperature bucket in the fingerprint
    #[serde(default = "default_temperature_bucket")]
    pub temperature_bucket: f64,
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity == 0 {
            return Err(ValidationError::out_of_range(
                "cache.capacity",
                1.0,
                usize::MAX as f64,
                0.0,
            ));
        }
        if !self.temperature_bucket.is_finite() || self.temperature_bucket <= 0.0 {
            return Err(ValidationError::out_of_range(
                "cache.temperature_bucket",
                f64::MIN_POSITIVE,
                f64::MAX,
                self.temperature_bucket,
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            temperature_bucket: default_temperature_bucket(),
        }
    }
}

fn default_capacity() -> usize {
    1_000
}

fn default_temperature_bucket() -> f64 {
    0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CacheConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = CacheConfig {
            capacity: 0,
            ..CacheConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
