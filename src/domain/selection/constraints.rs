//! Explicit user constraints on a generation request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::AttributeCategory;
use crate::domain::foundation::ValidationError;

/// Maximum extra weight a user may put behind one pinned value.
const MAX_EMPHASIS: f64 = 0.5;

/// Values the user pinned for specific categories, plus optional emphasis.
///
/// Pinned categories bypass the bandit entirely: the value is used as-is,
/// no arm is consulted, and feedback does not update an arm for it.
/// Ordered maps keep the constraint set canonically sorted, which the cache
/// fingerprint depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConstraints {
    pinned: BTreeMap<AttributeCategory, String>,
    emphasis: BTreeMap<AttributeCategory, EmphasisWeight>,
}

/// Validated extra prompt weight in [0, MAX_EMPHASIS].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmphasisWeight(f64);

impl EmphasisWeight {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=MAX_EMPHASIS).contains(&value) {
            return Err(ValidationError::out_of_range(
                "emphasis",
                0.0,
                MAX_EMPHASIS,
                value,
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl GenerationConstraints {
    /// No constraints at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Pins a category to an explicit value.
    pub fn pin(
        &mut self,
        category: AttributeCategory,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty_field("pinned_value"));
        }
        self.pinned.insert(category, value);
        Ok(())
    }

    /// Pins a category, builder-style.
    pub fn with_pin(
        mut self,
        category: AttributeCategory,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.pin(category, value)?;
        Ok(self)
    }

    /// Adds extra prompt weight behind a pinned category.
    pub fn emphasize(
        &mut self,
        category: AttributeCategory,
        weight: f64,
    ) -> Result<(), ValidationError> {
        self.emphasis.insert(category, EmphasisWeight::new(weight)?);
        Ok(())
    }

    /// Adds emphasis, builder-style.
    pub fn with_emphasis(
        mut self,
        category: AttributeCategory,
        weight: f64,
    ) -> Result<Self, ValidationError> {
        self.emphasize(category, weight)?;
        Ok(self)
    }

    /// The value pinned for a category, if any.
    pub fn pinned_value(&self, category: AttributeCategory) -> Option<&str> {
        self.pinned.get(&category).map(String::as_str)
    }

    /// Extra weight requested for a category; zero when unspecified.
    pub fn emphasis_for(&self, category: AttributeCategory) -> f64 {
        self.emphasis.get(&category).map_or(0.0, |w| w.value())
    }

    /// True when nothing is pinned or emphasized.
    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.emphasis.is_empty()
    }

    /// Canonical string form of the constraint set, sorted by category.
    ///
    /// Used as the constraint component of the cache fingerprint; two
    /// constraint sets with identical content always produce identical keys.
    pub fn canonical_key(&self) -> String {
        let mut parts = Vec::new();
        for (category, value) in &self.pinned {
            parts.push(format!("pin:{}={}", category, value));
        }
        for (category, weight) in &self.emphasis {
            parts.push(format!("emp:{}={:.2}", category, weight.value()));
        }
        parts.join("&")
    }
}
