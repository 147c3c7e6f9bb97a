//! Error types for the bandit model.

use thiserror::Error;

/// Errors raised by bandit state updates.
///
/// These are internal signals: the learning loop retries or logs them, they
/// are never surfaced as user-facing failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BanditError {
    /// A counter CAS kept losing against concurrent updates.
    #[error("Arm update lost {attempts} compare-and-swap attempts under contention")]
    ConcurrentUpdateConflict { attempts: u32 },

    /// Update weight was non-finite or not positive.
    #[error("Invalid outcome weight {weight}; must be finite and positive")]
    InvalidWeight { weight: f64 },

    /// Decay factor outside (0, 1].
    #[error("Invalid decay factor {factor}; must be in (0, 1]")]
    InvalidDecayFactor { factor: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_attempts() {
        let err = BanditError::ConcurrentUpdateConflict { attempts: 8 };
        assert!(err.to_string().contains("8 compare-and-swap"));
    }
}
