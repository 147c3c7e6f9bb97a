//! Feedback learning configuration

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::learning::LearningWeights;

/// Learning weights and decision retention
#[derive(Debug, Clone, Deserialize)]
pub struct LearningConfig {
    /// Success weight for a like or save
    #[serde(default = "default_like_weight")]
    pub like_weight: f64,

    /// Failure weight for a dislike
    #[serde(default = "default_dislike_weight")]
    pub dislike_weight: f64,

    /// Success weight for the value a critique asks for
    #[serde(default = "default_critique_success_weight")]
    pub critique_success_weight: f64,

    /// Failure weight for the value a critique replaces
    #[serde(default = "default_critique_failure_weight")]
    pub critique_failure_weight: f64,

    /// How many recent decisions stay resolvable for feedback
    #[serde(default = "default_decision_retention")]
    pub decision_retention: usize,
}

impl LearningConfig {
    /// Validate learning configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("learning.like_weight", self.like_weight),
            ("learning.dislike_weight", self.dislike_weight),
            ("learning.critique_success_weight", self.critique_success_weight),
            ("learning.critique_failure_weight", self.critique_failure_weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::out_of_range(
                    field,
                    f64::MIN_POSITIVE,
                    f64::MAX,
                    value,
                ));
            }
        }
        if self.decision_retention == 0 {
            return Err(ValidationError::out_of_range(
                "learning.decision_retention",
                1.0,
                usize::MAX as f64,
                0.0,
            ));
        }
        Ok(())
    }

    /// Build the weight set used by the learner
    pub fn weights(&self) -> LearningWeights {
        LearningWeights {
            like: self.like_weight,
            dislike: self.dislike_weight,
            critique_success: self.critique_success_weight,
            critique_failure: self.critique_failure_weight,
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            like_weight: default_like_weight(),
            dislike_weight: default_dislike_weight(),
            critique_success_weight: default_critique_success_weight(),
            critique_failure_weight: default_critique_failure_weight(),
            decision_retention: default_decision_retention(),
        }
    }
}

fn default_like_weight() -> f64 {
    1.0
}

fn default_dislike_weight() -> f64 {
    1.0
}

fn default_critique_success_weight() -> f64 {
    3.0
}

fn default_critique_failure_weight() -> f64 {
    1.0
}

fn default_decision_retention() -> usize {
    10_000
}
