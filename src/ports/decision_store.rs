//! DecisionStore port - decision retention for feedback resolution.
//!
//! Feedback can arrive long after the prompt that triggered it, and after
//! the cache has evicted the entry. Decisions are therefore kept in their
//! own store, keyed by id, for as long as the retention policy allows.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::DecisionId;
use crate::domain::selection::Decision;

/// Port for saving and resolving decisions.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Persists a decision. Saving the same id twice is idempotent.
    async fn save(&self, decision: Decision) -> Result<(), DecisionStoreError>;

    /// Looks up a decision by id; `None` when it fell out of retention.
    async fn find(&self, id: DecisionId) -> Result<Option<Decision>, DecisionStoreError>;
}

/// Errors from the decision store.
#[derive(Debug, Clone, Error)]
pub enum DecisionStoreError {
    /// The backing store could not be reached.
    #[error("Decision store unavailable: {0}")]
    Unavailable(String),
}
