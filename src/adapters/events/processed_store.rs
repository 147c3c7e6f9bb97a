//! In-memory processed-event store.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::domain::foundation::EventId;
use crate::ports::{EventStoreError, ProcessedEventStore};

/// Processed-event tracking backed by a HashSet.
///
/// Grows without bound; suitable for tests and single-process deployments
/// where the process lifetime bounds the set.
#[derive(Debug, Default)]
pub struct InMemoryProcessedEventStore {
    processed: RwLock<HashSet<EventId>>,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn contains(&self, event_id: &EventId) -> Result<bool, EventStoreError> {
        Ok(self.processed.read().await.contains(event_id))
    }

    async fn mark_processed(&self, event_id: &EventId) -> Result<(), EventStoreError> {
        self.processed.write().await.insert(*event_id);
        Ok(())
    }
}
