//! Attribute category and value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The closed set of fashion attribute categories the engine selects over.
///
/// Extensible only by a catalog update; unknown names are rejected when a
/// catalog is built from external profile data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    Garment,
    Silhouette,
    Fabric,
    Color,
    StyleContext,
}

impl AttributeCategory {
    /// All categories in their canonical rendering order.
    pub const ALL: [AttributeCategory; 5] = [
        AttributeCategory::Garment,
        AttributeCategory::Silhouette,
        AttributeCategory::Fabric,
        AttributeCategory::Color,
        AttributeCategory::StyleContext,
    ];

    /// Returns the string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeCategory::Garment => "garment",
            AttributeCategory::Silhouette => "silhouette",
            AttributeCategory::Fabric => "fabric",
            AttributeCategory::Color => "color",
            AttributeCategory::StyleContext => "style_context",
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttributeCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "garment" => Ok(AttributeCategory::Garment),
            "silhouette" => Ok(AttributeCategory::Silhouette),
            "fabric" => Ok(AttributeCategory::Fabric),
            "color" => Ok(AttributeCategory::Color),
            "style_context" | "styleContext" => Ok(AttributeCategory::StyleContext),
            other => Err(ValidationError::unknown_category(other)),
        }
    }
}

/// One candidate value within a category.
///
/// Immutable once derived from a style profile snapshot. The base weight
/// carries the value's co-occurrence strength in the portfolio, when the
/// profile aggregation provides one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    name: String,
    base_weight: Option<f64>,
}

impl AttributeValue {
    /// Creates a value with no base weight.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("attribute_value"));
        }
        Ok(Self {
            name,
            base_weight: None,
        })
    }

    /// Creates a value with a portfolio-derived base weight.
    pub fn with_base_weight(
        name: impl Into<String>,
        base_weight: f64,
    ) -> Result<Self, ValidationError> {
        if !base_weight.is_finite() || base_weight < 0.0 {
            return Err(ValidationError::out_of_range(
                "base_weight",
                0.0,
                f64::MAX,
                base_weight,
            ));
        }
        let mut value = Self::new(name)?;
        value.base_weight = Some(base_weight);
        Ok(value)
    }

    /// Returns the value name, unique within its category.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the portfolio co-occurrence weight, if known.
    pub fn base_weight(&self) -> Option<f64> {
        self.base_weight
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
