//! In-memory profile provider for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{AttributeCatalog, ProfileVersion};
use crate::domain::foundation::UserId;
use crate::ports::{ProfileError, ProfileProvider};

/// Profile provider backed by a map of preloaded catalogs.
///
/// Unknown users get an empty catalog at the initial version, matching the
/// contract that sparse profiles degrade rather than fail.
#[derive(Debug, Default)]
pub struct StaticProfileProvider {
    catalogs: Arc<RwLock<HashMap<UserId, AttributeCatalog>>>,
}

impl StaticProfileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) a user's catalog.
    pub async fn set_catalog(&self, user_id: UserId, catalog: AttributeCatalog) {
        self.catalogs.write().await.insert(user_id, catalog);
    }
}

#[async_trait]
impl ProfileProvider for StaticProfileProvider {
    async fn attribute_catalog(&self, user_id: &UserId) -> Result<AttributeCatalog, ProfileError> {
        let catalogs = self.catalogs.read().await;
        Ok(catalogs
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| AttributeCatalog::new(ProfileVersion::initial())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{AttributeCategory, AttributeValue};

    #[tokio::test]
    async fn unknown_user_gets_an_empty_catalog() {
        let provider = StaticProfileProvider::new();
        let catalog = provider
            .attribute_catalog(&UserId::new("nobody").unwrap())
            .await
            .unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.version(), ProfileVersion::initial());
    }

    #[tokio::test]
    async fn preloaded_catalog_is_returned() {
        let user = UserId::new("u1").unwrap();
        let catalog = AttributeCatalog::new(ProfileVersion::initial()).with_value(
            AttributeCategory::Garment,
            AttributeValue::new("dress").unwrap(),
        );
        let provider = StaticProfileProvider::new();
        provider.set_catalog(user.clone(), catalog.clone()).await;

        let fetched = provider.attribute_catalog(&user).await.unwrap();
        assert_eq!(fetched, catalog);
    }
}
