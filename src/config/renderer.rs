//! Prompt renderer configuration

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::rendering::TokenBudget;

/// Renderer output limits
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Token budget for one rendered prompt
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,
}

impl RendererConfig {
    /// Validate renderer configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.budget().map(|_| ())
    }

    /// Build the validated budget value object
    pub fn budget(&self) -> Result<TokenBudget, ValidationError> {
        TokenBudget::new(self.token_budget)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
        }
    }
}

fn default_token_budget() -> usize {
    75
}
