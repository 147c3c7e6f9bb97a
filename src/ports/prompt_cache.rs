//! PromptCache port - single-flight cache over rendered prompts.
//!
//! The cache maps a decision fingerprint to the prompt (and decision) a
//! previous identical request produced, so repeated requests skip the
//! selector and renderer entirely. The contract every implementation must
//! honor:
//!
//! - **Single flight**: at most one concurrent compute per fingerprint.
//!   Concurrent callers for the same key wait for the leader's result.
//! - **No error caching**: a failed compute is never stored; the next
//!   caller (or a waiting one) retries fresh.
//! - **Bounded**: capacity-limited with least-recently-used eviction.
//! - **Invalidation**: feedback and profile changes evict per user.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::rendering::RenderedPrompt;
use crate::domain::selection::{Decision, DecisionFingerprint};

/// A cached prompt together with the decision that produced it.
///
/// The decision rides along so feedback on a cached result can still locate
/// the exact arms to update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPrompt {
    pub prompt: RenderedPrompt,
    pub decision: Decision,
}

/// Result of a cache lookup, with hit/miss provenance for observability.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOutcome {
    pub cached: CachedPrompt,
    pub hit: bool,
}

/// Future type produced by the compute callback on a miss.
pub type ComputeFuture = BoxFuture<'static, Result<CachedPrompt, CacheError>>;

/// Port for the prompt cache.
#[async_trait]
pub trait PromptCache: Send + Sync {
    /// Returns the cached prompt for a fingerprint, computing it at most
    /// once across concurrent callers on a miss.
    async fn get_or_compute(
        &self,
        fingerprint: DecisionFingerprint,
        compute: Box<dyn FnOnce() -> ComputeFuture + Send>,
    ) -> Result<CacheOutcome, CacheError>;

    /// Evicts every entry belonging to a user; returns how many were
    /// dropped. Conservative but correct after any bandit update.
    async fn invalidate(&self, user_id: &UserId) -> usize;

    /// Evicts a single fingerprint; returns true if it was present.
    async fn invalidate_key(&self, fingerprint: &DecisionFingerprint) -> bool;

    /// Number of ready entries currently cached.
    async fn entry_count(&self) -> usize;
}

/// Errors surfaced by cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The wrapped compute function failed. Not cached; retried by the
    /// next caller.
    #[error("Prompt compute failed: {0}")]
    Compute(String),
}
