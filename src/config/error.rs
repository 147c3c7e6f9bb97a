//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variables could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}
