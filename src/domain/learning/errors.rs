//! Error types for the learning loop.

use thiserror::Error;

use crate::domain::bandit::BanditError;
use crate::domain::catalog::AttributeCategory;
use crate::domain::foundation::DecisionId;

/// Errors raised while applying feedback.
///
/// All recoverable: the learning loop logs and drops the event rather than
/// crashing, and no error here reaches the end user as a hard failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LearningError {
    /// The referenced decision is no longer resolvable (evicted and not
    /// persisted), or belongs to a different user.
    #[error("Feedback references unresolvable decision {decision_id}")]
    InvalidFeedbackReference { decision_id: DecisionId },

    /// A critique delta targets a category the decision never chose.
    #[error("Critique targets category '{category}' absent from the decision")]
    CritiqueTargetMissing { category: AttributeCategory },

    /// An arm update failed after bounded retries.
    #[error("Arm update failed: {0}")]
    ArmUpdate(#[from] BanditError),
}
