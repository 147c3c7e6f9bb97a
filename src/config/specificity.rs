//! Specificity analyzer configuration

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::specificity::TemperatureRange;

/// Temperature range derived from command specificity
#[derive(Debug, Clone, Deserialize)]
pub struct SpecificityConfig {
    /// Temperature for a maximally specific command
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,

    /// Temperature for a maximally vague command
    #[serde(default = "default_max_temperature")]
    pub max_temperature: f64,

    /// Score above which a request counts as specific
    #[serde(default = "default_specific_threshold")]
    pub specific_threshold: f64,
}

impl SpecificityConfig {
    /// Validate the configured range
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.temperature_range().map(|_| ())
    }

    /// Build the validated analyzer parameter object
    pub fn temperature_range(&self) -> Result<TemperatureRange, ValidationError> {
        TemperatureRange::new(
            self.min_temperature,
            self.max_temperature,
            self.specific_threshold,
        )
    }
}

impl Default for SpecificityConfig {
    fn default() -> Self {
        Self {
            min_temperature: default_min_temperature(),
            max_temperature: default_max_temperature(),
            specific_threshold: default_specific_threshold(),
        }
    }
}

fn default_min_temperature() -> f64 {
    0.3
}

fn default_max_temperature() -> f64 {
    1.2
}

fn default_specific_threshold() -> f64 {
    0.6
}
