//! Outcome reported for one feedback submission.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EventId;

/// What happened to a feedback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LearningResult {
    /// The event updated the model and the user's cache was invalidated.
    Applied {
        event_id: EventId,
        arm_updates: usize,
        cache_entries_evicted: usize,
    },
    /// Duplicate delivery of an already-processed event; counters untouched.
    Duplicate { event_id: EventId },
    /// The event could not be applied; logged and dropped.
    Dropped { event_id: EventId, reason: String },
}

impl LearningResult {
    /// True iff the model actually changed.
    pub fn was_applied(&self) -> bool {
        matches!(self, LearningResult::Applied { .. })
    }

    pub fn event_id(&self) -> EventId {
        match self {
            LearningResult::Applied { event_id, .. }
            | LearningResult::Duplicate { event_id }
            | LearningResult::Dropped { event_id, .. } => *event_id,
        }
    }
}
