//! BanditSnapshotStore port - fire-and-forget state persistence.
//!
//! Durable storage of bandit state belongs to an external collaborator.
//! The engine pushes snapshots after learning updates without awaiting the
//! result on the decision path, and restores on startup when a snapshot
//! exists. Whatever the backing store is, it must hand back counters that
//! still satisfy the arm invariants; the restore path clamps anything that
//! does not.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::bandit::BanditSnapshot;
use crate::domain::foundation::UserId;

/// Port for persisting and restoring per-user bandit state.
#[async_trait]
pub trait BanditSnapshotStore: Send + Sync {
    /// Persists a snapshot, replacing any previous one for the user.
    async fn persist(&self, snapshot: BanditSnapshot) -> Result<(), SnapshotError>;

    /// Loads the latest snapshot for a user, if any.
    async fn load(&self, user_id: &UserId) -> Result<Option<BanditSnapshot>, SnapshotError>;
}

/// Errors from the snapshot collaborator.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    /// The backing store could not be reached.
    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),
}
