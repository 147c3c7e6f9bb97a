//! DecayArms - on-demand decay pass for one user.
//!
//! Lets stale preferences fade so no arm stays permanently dominant. The
//! decay factor comes from configuration; scheduling is the caller's
//! concern (a cron-like task, an admin action, or a test).

use std::sync::Arc;

use crate::domain::bandit::{BanditError, BanditModel};
use crate::domain::foundation::UserId;
use crate::ports::{BanditSnapshotStore, PromptCache};

/// Command to decay one user's counters.
#[derive(Debug, Clone)]
pub struct DecayArmsCommand {
    pub user_id: UserId,
}

/// Result of a decay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayResult {
    pub arms_decayed: usize,
}

/// Handler running decay passes.
pub struct DecayArmsHandler {
    model: Arc<BanditModel>,
    cache: Arc<dyn PromptCache>,
    snapshots: Arc<dyn BanditSnapshotStore>,
    decay_factor: f64,
}

impl DecayArmsHandler {
    pub fn new(
        model: Arc<BanditModel>,
        cache: Arc<dyn PromptCache>,
        snapshots: Arc<dyn BanditSnapshotStore>,
        decay_factor: f64,
    ) -> Self {
        Self {
            model,
            cache,
            snapshots,
            decay_factor,
        }
    }

    /// Decays all of a user's arms, then invalidates their cache entries
    /// since every posterior moved.
    pub async fn handle(&self, cmd: DecayArmsCommand) -> Result<DecayResult, BanditError> {
        let arms_decayed = self.model.decay(&cmd.user_id, self.decay_factor)?;

        if arms_decayed > 0 {
            let evicted = self.cache.invalidate(&cmd.user_id).await;

            let snapshot = self.model.snapshot(&cmd.user_id);
            let snapshots = Arc::clone(&self.snapshots);
            let user_id = cmd.user_id.clone();
            tokio::spawn(async move {
                if let Err(err) = snapshots.persist(snapshot).await {
                    tracing::warn!(user = %user_id, error = %err, "Bandit snapshot persist failed");
                }
            });

            tracing::info!(
                user = %cmd.user_id,
                arms_decayed,
                cache_evicted = evicted,
                factor = self.decay_factor,
                "Decay pass complete"
            );
        }

        Ok(DecayResult { arms_decayed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryPromptCache, InMemorySnapshotStore};
    use crate::domain::catalog::AttributeCategory;

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn handler(model: &Arc<BanditModel>, factor: f64) -> DecayArmsHandler {
        DecayArmsHandler::new(
            Arc::clone(model),
            Arc::new(InMemoryPromptCache::new(10)),
            Arc::new(InMemorySnapshotStore::new()),
            factor,
        )
    }

    #[tokio::test]
    async fn decay_shrinks_counters() {
        let model = Arc::new(BanditModel::with_defaults());
        for _ in 0..10 {
            model
                .record_outcome(&user(), AttributeCategory::Color, "navy", true, 1.0)
                .unwrap();
        }

        let result = handler(&model, 0.9)
            .handle(DecayArmsCommand { user_id: user() })
            .await
            .unwrap();

        assert_eq!(result.arms_decayed, 1);
        let counts = model
            .counts(&user(), AttributeCategory::Color, "navy")
            .unwrap();
        assert!((counts.success - 9.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn decay_for_fresh_user_is_a_noop() {
        let model = Arc::new(BanditModel::with_defaults());
        let result = handler(&model, 0.9)
            .handle(DecayArmsCommand { user_id: user() })
            .await
            .unwrap();

        assert_eq!(result.arms_decayed, 0);
    }

    #[tokio::test]
    async fn invalid_factor_is_rejected() {
        let model = Arc::new(BanditModel::with_defaults());
        model
            .record_outcome(&user(), AttributeCategory::Color, "navy", true, 1.0)
            .unwrap();

        let result = handler(&model, 1.4)
            .handle(DecayArmsCommand { user_id: user() })
            .await;

        assert!(matches!(
            result,
            Err(BanditError::InvalidDecayFactor { .. })
        ));
    }
}
