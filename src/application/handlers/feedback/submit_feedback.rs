//! SubmitFeedback - applying one feedback event to the model.
//!
//! Event lifecycle: received -> validated -> applied -> cache-invalidated.
//! Every failure mode is recoverable: duplicates are ignored, unresolvable
//! references are logged and dropped, and nothing here can take the
//! learning loop down.

use std::sync::Arc;

use crate::domain::bandit::BanditModel;
use crate::domain::foundation::{DecisionId, UserId, ValidationError};
use crate::domain::learning::{
    CritiqueDelta, FeedbackEvent, FeedbackLearner, FeedbackOutcome, LearningResult,
};
use crate::ports::{BanditSnapshotStore, DecisionStore, ProcessedEventStore, PromptCache};

/// Command for one explicit feedback submission.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackCommand {
    pub user_id: UserId,
    /// The decision the user reacted to.
    pub decision_id: DecisionId,
    pub outcome: FeedbackOutcome,
    /// Structured changes, for critique outcomes.
    pub critique: Vec<CritiqueDelta>,
}

/// Handler applying feedback events.
pub struct SubmitFeedbackHandler {
    model: Arc<BanditModel>,
    learner: FeedbackLearner,
    decisions: Arc<dyn DecisionStore>,
    processed: Arc<dyn ProcessedEventStore>,
    cache: Arc<dyn PromptCache>,
    snapshots: Arc<dyn BanditSnapshotStore>,
}

impl SubmitFeedbackHandler {
    pub fn new(
        model: Arc<BanditModel>,
        learner: FeedbackLearner,
        decisions: Arc<dyn DecisionStore>,
        processed: Arc<dyn ProcessedEventStore>,
        cache: Arc<dyn PromptCache>,
        snapshots: Arc<dyn BanditSnapshotStore>,
    ) -> Self {
        Self {
            model,
            learner,
            decisions,
            processed,
            cache,
            snapshots,
        }
    }

    /// Builds a fresh event from an explicit user action and applies it.
    ///
    /// Returns `Err` only for malformed input (e.g. a critique without
    /// deltas); everything past construction resolves to a
    /// [`LearningResult`].
    pub async fn handle(
        &self,
        cmd: SubmitFeedbackCommand,
    ) -> Result<LearningResult, ValidationError> {
        let event = FeedbackEvent::new(cmd.user_id, cmd.decision_id, cmd.outcome, cmd.critique)?;
        Ok(self.apply_event(event).await)
    }

    /// Applies an already-constructed event, e.g. one delivered by a
    /// feedback source. Never fails; problems become `Dropped` results.
    pub async fn apply_event(&self, event: FeedbackEvent) -> LearningResult {
        let event_id = event.id();

        // received -> validated: duplicate detection first, so a redelivery
        // cannot double-count arm updates.
        match self.processed.contains(&event_id).await {
            Ok(true) => {
                tracing::debug!(event = %event_id, "Duplicate feedback event ignored");
                return LearningResult::Duplicate { event_id };
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(event = %event_id, error = %err, "Dedup store unavailable; dropping event");
                return LearningResult::Dropped {
                    event_id,
                    reason: err.to_string(),
                };
            }
        }

        let decision = match self.decisions.find(event.decision_id()).await {
            Ok(Some(decision)) => decision,
            Ok(None) => {
                tracing::warn!(
                    event = %event_id,
                    decision = %event.decision_id(),
                    "Feedback references unresolvable decision; dropping"
                );
                return LearningResult::Dropped {
                    event_id,
                    reason: format!("decision {} not resolvable", event.decision_id()),
                };
            }
            Err(err) => {
                tracing::warn!(event = %event_id, error = %err, "Decision store unavailable; dropping event");
                return LearningResult::Dropped {
                    event_id,
                    reason: err.to_string(),
                };
            }
        };

        // validated -> applied
        let applied = match self.learner.apply(&event, &decision) {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!(event = %event_id, error = %err, "Feedback apply failed; dropping event");
                return LearningResult::Dropped {
                    event_id,
                    reason: err.to_string(),
                };
            }
        };

        // Marked only after a successful apply, so a failed apply stays
        // retryable on redelivery.
        if let Err(err) = self.processed.mark_processed(&event_id).await {
            tracing::warn!(event = %event_id, error = %err, "Failed to mark event processed");
        }

        // applied -> cache-invalidated: the posterior moved, so cached
        // decisions for this user are stale.
        let evicted = self.cache.invalidate(event.user_id()).await;

        self.persist_snapshot(event.user_id().clone());

        tracing::info!(
            event = %event_id,
            user = %event.user_id(),
            outcome = %event.outcome(),
            arm_updates = applied.arm_updates,
            cache_evicted = evicted,
            "Feedback applied"
        );

        LearningResult::Applied {
            event_id,
            arm_updates: applied.arm_updates,
            cache_entries_evicted: evicted,
        }
    }

    /// Pushes the user's updated state to the snapshot collaborator.
    ///
    /// Fire-and-forget: the decision path never waits on persistence.
    fn persist_snapshot(&self, user_id: UserId) {
        let snapshot = self.model.snapshot(&user_id);
        let snapshots = Arc::clone(&self.snapshots);
        tokio::spawn(async move {
            if let Err(err) = snapshots.persist(snapshot).await {
                tracing::warn!(user = %user_id, error = %err, "Bandit snapshot persist failed");
            }
        });
    }
}
