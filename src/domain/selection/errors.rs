//! Error types for prompt selection.

use thiserror::Error;

/// Errors raised while drawing a decision.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// Every category was empty and nothing was pinned; the caller should
    /// fall back to a neutral decision rather than surface this.
    #[error("No candidate values in any category; catalog is empty")]
    NoCandidates,
}
