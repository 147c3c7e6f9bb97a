//! ProfileProvider port - versioned attribute catalogs.
//!
//! The aggregated style profile (vision-model extraction, deduplication,
//! portfolio statistics) is owned by an external collaborator. The engine
//! only ever reads its output: a versioned catalog of candidate values per
//! attribute category.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::AttributeCatalog;
use crate::domain::foundation::UserId;

/// Port for reading a user's current attribute catalog.
///
/// Implementations should be cheap to call per request; the engine does not
/// cache catalogs itself, only rendered prompts.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Returns the current catalog for a user.
    ///
    /// A brand-new user with no analyzed portfolio yet should get an empty
    /// catalog rather than an error; the engine degrades to a neutral
    /// prompt in that case.
    async fn attribute_catalog(&self, user_id: &UserId) -> Result<AttributeCatalog, ProfileError>;
}

/// Errors from the profile collaborator.
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// The profile service could not be reached.
    #[error("Profile provider unavailable: {0}")]
    Unavailable(String),

    /// The provider returned data the catalog boundary rejected.
    #[error("Profile data invalid: {0}")]
    InvalidData(String),
}
