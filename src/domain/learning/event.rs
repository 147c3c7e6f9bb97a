//! Feedback event value objects.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::AttributeCategory;
use crate::domain::foundation::{DecisionId, EventId, Timestamp, UserId, ValidationError};

/// What the user did with a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Like,
    Dislike,
    Save,
    Critique,
}

impl FeedbackOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackOutcome::Like => "like",
            FeedbackOutcome::Dislike => "dislike",
            FeedbackOutcome::Save => "save",
            FeedbackOutcome::Critique => "critique",
        }
    }
}

impl std::fmt::Display for FeedbackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One explicitly requested change from a critique.
///
/// "Make it silk instead" becomes a delta on the fabric category: strong
/// success signal on the new value, mild failure on the value it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueDelta {
    pub category: AttributeCategory,
    pub new_value: String,
}

impl CritiqueDelta {
    pub fn new(
        category: AttributeCategory,
        new_value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let new_value = new_value.into();
        if new_value.trim().is_empty() {
            return Err(ValidationError::empty_field("critique_new_value"));
        }
        Ok(Self {
            category,
            new_value,
        })
    }
}

/// An append-only record of one user reaction.
///
/// Never mutated after creation; the event id is the deduplication key for
/// duplicate deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    id: EventId,
    user_id: UserId,
    decision_id: DecisionId,
    outcome: FeedbackOutcome,
    critique: Vec<CritiqueDelta>,
    occurred_at: Timestamp,
}

impl FeedbackEvent {
    /// Creates an event; critique outcomes must carry at least one delta,
    /// and deltas are only meaningful on critiques.
    pub fn new(
        user_id: UserId,
        decision_id: DecisionId,
        outcome: FeedbackOutcome,
        critique: Vec<CritiqueDelta>,
    ) -> Result<Self, ValidationError> {
        match outcome {
            FeedbackOutcome::Critique if critique.is_empty() => {
                return Err(ValidationError::empty_field("critique"));
            }
            FeedbackOutcome::Critique => {}
            _ if !critique.is_empty() => {
                return Err(ValidationError::invalid_format(
                    "critique",
                    format!("deltas are only valid on critique events, got {}", outcome),
                ));
            }
            _ => {}
        }

        Ok(Self {
            id: EventId::new(),
            user_id,
            decision_id,
            outcome,
            critique,
            occurred_at: Timestamp::now(),
        })
    }

    /// Rebuilds an event delivered by an external feedback source, keeping
    /// its original id and timestamp so dedup works across redeliveries.
    pub fn from_delivery(
        id: EventId,
        user_id: UserId,
        decision_id: DecisionId,
        outcome: FeedbackOutcome,
        critique: Vec<CritiqueDelta>,
        occurred_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let mut event = Self::new(user_id, decision_id, outcome, critique)?;
        event.id = id;
        event.occurred_at = occurred_at;
        Ok(event)
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn decision_id(&self) -> DecisionId {
        self.decision_id
    }

    pub fn outcome(&self) -> FeedbackOutcome {
        self.outcome
    }

    pub fn critique(&self) -> &[CritiqueDelta] {
        &self.critique
    }

    pub fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }
}
