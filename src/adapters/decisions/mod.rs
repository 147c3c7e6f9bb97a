//! Bounded in-memory decision store.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use crate::domain::foundation::DecisionId;
use crate::domain::selection::Decision;
use crate::ports::{DecisionStore, DecisionStoreError};

/// In-memory decision store with FIFO retention.
///
/// Keeps the most recent `capacity` decisions; feedback referencing an
/// aged-out decision resolves to `None`, which the submit path reports as
/// an invalid reference and drops.
pub struct InMemoryDecisionStore {
    capacity: usize,
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    decisions: HashMap<DecisionId, Decision>,
    order: VecDeque<DecisionId>,
}

impl InMemoryDecisionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Number of retained decisions.
    pub async fn len(&self) -> usize {
        self.state.read().await.decisions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DecisionStore for InMemoryDecisionStore {
    async fn save(&self, decision: Decision) -> Result<(), DecisionStoreError> {
        let mut state = self.state.write().await;
        let id = decision.id();
        if state.decisions.insert(id, decision).is_none() {
            state.order.push_back(id);
        }

        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.decisions.remove(&oldest);
            }
        }
        Ok(())
    }

    async fn find(&self, id: DecisionId) -> Result<Option<Decision>, DecisionStoreError> {
        Ok(self.state.read().await.decisions.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProfileVersion;
    use crate::domain::foundation::UserId;

    fn decision() -> Decision {
        Decision::neutral(
            UserId::new("u1").unwrap(),
            ProfileVersion::initial(),
            0.7,
        )
    }

    #[tokio::test]
    async fn saved_decisions_are_found() {
        let store = InMemoryDecisionStore::new(10);
        let d = decision();
        store.save(d.clone()).await.unwrap();

        assert_eq!(store.find(d.id()).await.unwrap(), Some(d));
    }

    #[tokio::test]
    async fn unknown_id_resolves_to_none() {
        let store = InMemoryDecisionStore::new(10);
        assert_eq!(store.find(DecisionId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn retention_evicts_oldest_first() {
        let store = InMemoryDecisionStore::new(2);
        let first = decision();
        let second = decision();
        let third = decision();

        for d in [&first, &second, &third] {
            store.save((*d).clone()).await.unwrap();
        }

        assert_eq!(store.len().await, 2);
        assert!(store.find(first.id()).await.unwrap().is_none());
        assert!(store.find(third.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn double_save_is_idempotent() {
        let store = InMemoryDecisionStore::new(2);
        let d = decision();
        store.save(d.clone()).await.unwrap();
        store.save(d.clone()).await.unwrap();

        assert_eq!(store.len().await, 1);
    }
}
