//! Attribute catalog: the candidate values the engine may choose from.
//!
//! The catalog is derived from an aggregated style profile owned by an
//! external collaborator. It is read-only and versioned; a new profile
//! snapshot produces a whole new catalog under a bumped [`ProfileVersion`].
//! Unknown category names are rejected at this boundary so untyped maps
//! never propagate into the engine.

mod attribute;
mod version;

pub use attribute::{AttributeCategory, AttributeValue};
pub use version::ProfileVersion;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Candidate attribute values per category for one profile snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeCatalog {
    version: ProfileVersion,
    categories: BTreeMap<AttributeCategory, Vec<AttributeValue>>,
}

impl AttributeCatalog {
    /// Creates an empty catalog for a profile version.
    pub fn new(version: ProfileVersion) -> Self {
        Self {
            version,
            categories: BTreeMap::new(),
        }
    }

    /// Builds a catalog from externally-provided category names.
    ///
    /// This is the boundary where the external profile aggregation's
    /// stringly-typed output is checked: an unknown category name fails
    /// with [`ValidationError::UnknownCategory`] instead of flowing on.
    pub fn from_external(
        version: ProfileVersion,
        categories: impl IntoIterator<Item = (String, Vec<String>)>,
    ) -> Result<Self, ValidationError> {
        let mut catalog = Self::new(version);
        for (name, values) in categories {
            let category: AttributeCategory = name.parse()?;
            for value in values {
                catalog.insert(category, AttributeValue::new(value)?);
            }
        }
        Ok(catalog)
    }

    /// Adds a value to a category, ignoring duplicates by name.
    pub fn insert(&mut self, category: AttributeCategory, value: AttributeValue) {
        let values = self.categories.entry(category).or_default();
        if !values.iter().any(|v| v.name() == value.name()) {
            values.push(value);
        }
    }

    /// Adds a value to a category, builder-style.
    pub fn with_value(mut self, category: AttributeCategory, value: AttributeValue) -> Self {
        self.insert(category, value);
        self
    }

    /// Returns the profile version this catalog was derived from.
    pub fn version(&self) -> ProfileVersion {
        self.version
    }

    /// Returns the candidate values for a category.
    ///
    /// A category with no extracted values yet returns an empty slice.
    pub fn values(&self, category: AttributeCategory) -> &[AttributeValue] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if no category has any candidate value.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    /// Total number of candidate values across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(name: &str) -> AttributeValue {
        AttributeValue::new(name).unwrap()
    }

    #[test]
    fn from_external_rejects_unknown_category() {
        let result = AttributeCatalog::from_external(
            ProfileVersion::initial(),
            vec![("neckline".to_string(), vec!["v-neck".to_string()])],
        );

        assert!(matches!(
            result,
            Err(ValidationError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn from_external_accepts_known_categories() {
        let catalog = AttributeCatalog::from_external(
            ProfileVersion::initial(),
            vec![
                ("garment".to_string(), vec!["dress".to_string()]),
                ("fabric".to_string(), vec!["silk".to_string(), "linen".to_string()]),
            ],
        )
        .unwrap();

        assert_eq!(catalog.values(AttributeCategory::Garment).len(), 1);
        assert_eq!(catalog.values(AttributeCategory::Fabric).len(), 2);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn insert_deduplicates_by_name() {
        let mut catalog = AttributeCatalog::new(ProfileVersion::initial());
        catalog.insert(AttributeCategory::Color, value("navy"));
        catalog.insert(AttributeCategory::Color, value("navy"));

        assert_eq!(catalog.values(AttributeCategory::Color).len(), 1);
    }

    #[test]
    fn empty_catalog_reports_empty() {
        let catalog = AttributeCatalog::new(ProfileVersion::initial());
        assert!(catalog.is_empty());

        let catalog = catalog.with_value(AttributeCategory::Garment, value("coat"));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn missing_category_yields_empty_slice() {
        let catalog = AttributeCatalog::new(ProfileVersion::initial());
        assert!(catalog.values(AttributeCategory::Silhouette).is_empty());
    }
}
