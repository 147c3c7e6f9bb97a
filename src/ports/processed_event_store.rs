//! ProcessedEventStore port - at-most-once feedback processing.
//!
//! Feedback delivery is at-least-once; without this guard a redelivered
//! like would double-count its arm updates. The store records which event
//! ids have already been applied.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::EventId;

/// Port for feedback idempotency tracking.
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// True if the event was already applied.
    async fn contains(&self, event_id: &EventId) -> Result<bool, EventStoreError>;

    /// Marks an event as applied. Called only after the model update
    /// succeeded, so a failed apply stays retryable.
    async fn mark_processed(&self, event_id: &EventId) -> Result<(), EventStoreError>;
}

/// Errors from the processed-event store.
#[derive(Debug, Clone, Error)]
pub enum EventStoreError {
    /// The backing store could not be reached.
    #[error("Processed-event store unavailable: {0}")]
    Unavailable(String),
}
