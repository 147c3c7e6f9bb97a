//! Bandit model configuration

use serde::Deserialize;

use crate::domain::foundation::ValidationError;

/// Tuning for the per-user bandit model
#[derive(Debug, Clone, Deserialize)]
pub struct BanditConfig {
    /// Number of user-table shards
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Bounded attempts for a counter compare-and-swap under contention
    #[serde(default = "default_max_cas_attempts")]
    pub max_cas_attempts: u32,

    /// Scale of the uniform exploration noise added per unit temperature
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,

    /// Multiplier applied to all counters by a decay pass
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,
}

impl BanditConfig {
    /// Validate bandit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.shard_count == 0 {
            return Err(ValidationError::out_of_range(
                "bandit.shard_count",
                1.0,
                usize::MAX as f64,
                0.0,
            ));
        }
        if self.max_cas_attempts == 0 {
            return Err(ValidationError::out_of_range(
                "bandit.max_cas_attempts",
                1.0,
                u32::MAX as f64,
                0.0,
            ));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(ValidationError::out_of_range(
                "bandit.noise_scale",
                0.0,
                f64::MAX,
                self.noise_scale,
            ));
        }
        if !self.decay_factor.is_finite()
            || self.decay_factor <= 0.0
            || self.decay_factor > 1.0
        {
            return Err(ValidationError::out_of_range(
                "bandit.decay_factor",
                f64::MIN_POSITIVE,
                1.0,
                self.decay_factor,
            ));
        }
        Ok(())
    }
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            shard_count: default_shard_count(),
            max_cas_attempts: default_max_cas_attempts(),
            noise_scale: default_noise_scale(),
            decay_factor: default_decay_factor(),
        }
    }
}

fn default_shard_count() -> usize {
    16
}

fn default_max_cas_attempts() -> u32 {
    16
}

fn default_noise_scale() -> f64 {
    0.35
}

fn default_decay_factor() -> f64 {
    0.9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(BanditConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_decay_is_rejected() {
        let config = BanditConfig {
            decay_factor: 1.5,
            ..BanditConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_shards_are_rejected() {
        let config = BanditConfig {
            shard_count: 0,
            ..BanditConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
