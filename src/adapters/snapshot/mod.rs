//! In-memory bandit snapshot store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::bandit::BanditSnapshot;
use crate::domain::foundation::UserId;
use crate::ports::{BanditSnapshotStore, SnapshotError};

/// Snapshot store keeping the latest snapshot per user in memory.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<UserId, BanditSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a stored snapshot.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

#[async_trait]
impl BanditSnapshotStore for InMemorySnapshotStore {
    async fn persist(&self, snapshot: BanditSnapshot) -> Result<(), SnapshotError> {
        self.snapshots
            .write()
            .await
            .insert(snapshot.user_id.clone(), snapshot);
        Ok(())
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<BanditSnapshot>, SnapshotError> {
        Ok(self.snapshots.read().await.get(user_id).cloned())
    }
}
