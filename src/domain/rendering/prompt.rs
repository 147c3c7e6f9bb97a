//! Rendered prompt value objects.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::AttributeCategory;

/// One entry of the structured prompt spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub category: AttributeCategory,
    pub value: String,
    pub weight: f64,
}

/// Structured view of a rendered prompt: category -> value -> weight.
///
/// Downstream feedback processing maps a "like" back onto the exact values
/// chosen through this spec, not by re-parsing the free text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PromptSpec {
    entries: Vec<SpecEntry>,
}

impl PromptSpec {
    pub fn new(entries: Vec<SpecEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    /// The weight rendered for a category, if it survived the budget.
    pub fn weight_for(&self, category: AttributeCategory) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final weighted prompt text plus its structured spec.
///
/// Immutable; identical decision and budget always produce an identical
/// rendered prompt, which cache correctness and the determinism tests rely
/// on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    text: String,
    spec: PromptSpec,
}

impl RenderedPrompt {
    pub fn new(text: String, spec: PromptSpec) -> Self {
        Self { text, spec }
    }

    /// The weighted prompt string sent to the image provider.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The structured spec used by feedback mapping.
    pub fn spec(&self) -> &PromptSpec {
        &self.spec
    }
}
