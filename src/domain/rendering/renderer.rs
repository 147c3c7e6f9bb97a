//! Turning a decision into a weighted prompt under a token budget.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::selection::{AttributePick, Decision, GenerationConstraints, PickOrigin};

use super::{PromptSpec, RenderedPrompt, SpecEntry};

/// Weight for picks that won through exploration; kept low so an
/// experimental value does not dominate the image.
const EXPLORE_WEIGHT: f64 = 1.05;

/// Exploit weights scale with posterior confidence across this range.
const EXPLOIT_WEIGHT_MIN: f64 = 1.15;
const EXPLOIT_WEIGHT_MAX: f64 = 1.30;

/// Base weight for user-pinned values, before any emphasis.
const PINNED_WEIGHT: f64 = 1.30;

/// Overhead tokens per emitted `(value:weight)` group.
const GROUP_OVERHEAD_TOKENS: usize = 2;

/// Validated token budget for one rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenBudget(usize);

impl TokenBudget {
    pub fn new(tokens: usize) -> Result<Self, ValidationError> {
        if tokens == 0 {
            return Err(ValidationError::out_of_range(
                "token_budget",
                1.0,
                usize::MAX as f64,
                0.0,
            ));
        }
        Ok(Self(tokens))
    }

    pub fn tokens(&self) -> usize {
        self.0
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self(75)
    }
}

/// Deterministic renderer: same decision and budget, byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct PromptRenderer;

impl PromptRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a decision as a weighted prompt string and structured spec.
    ///
    /// Each pick becomes `(value:weight)`, in canonical category order.
    /// When the estimate exceeds the budget, the lowest-weight unpinned
    /// groups are dropped first; pinned groups are never dropped.
    pub fn render(
        &self,
        decision: &Decision,
        constraints: &GenerationConstraints,
        budget: TokenBudget,
    ) -> RenderedPrompt {
        let mut weighted: Vec<(&AttributePick, f64)> = decision
            .picks()
            .iter()
            .map(|pick| (pick, pick_weight(pick, constraints)))
            .collect();
        // Canonical category order regardless of how picks were assembled.
        weighted.sort_by_key(|(pick, _)| pick.category);

        enforce_budget(&mut weighted, budget);

        let entries: Vec<SpecEntry> = weighted
            .iter()
            .map(|(pick, weight)| SpecEntry {
                category: pick.category,
                value: pick.value.clone(),
                // Round to the rendered precision so spec and text agree.
                weight: (weight * 100.0).round() / 100.0,
            })
            .collect();

        let text = entries
            .iter()
            .map(|e| format!("({}:{:.2})", e.value, e.weight))
            .collect::<Vec<_>>()
            .join(", ");

        RenderedPrompt::new(text, PromptSpec::new(entries))
    }
}

/// Derives the prompt weight for one pick.
fn pick_weight(pick: &AttributePick, constraints: &GenerationConstraints) -> f64 {
    let emphasis = constraints.emphasis_for(pick.category);
    match pick.origin {
        PickOrigin::Pinned => PINNED_WEIGHT + emphasis,
        PickOrigin::Explore => EXPLORE_WEIGHT + emphasis,
        PickOrigin::Exploit => {
            let confidence = pick.posterior_mean.unwrap_or(0.5).clamp(0.0, 1.0);
            EXPLOIT_WEIGHT_MIN
                + confidence * (EXPLOIT_WEIGHT_MAX - EXPLOIT_WEIGHT_MIN)
                + emphasis
        }
    }
}

/// Drops lowest-weight unpinned groups until the estimate fits.
fn enforce_budget(weighted: &mut Vec<(&AttributePick, f64)>, budget: TokenBudget) {
    while estimated_tokens(weighted) > budget.tokens() {
        let victim = weighted
            .iter()
            .enumerate()
            .filter(|(_, (pick, _))| !pick.is_pinned())
            // Ties break on the later category, keeping drops deterministic.
            .min_by(|(_, (pa, wa)), (_, (pb, wb))| {
                wa.partial_cmp(wb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(pb.category.cmp(&pa.category))
            })
            .map(|(i, _)| i);

        match victim {
            Some(i) => {
                weighted.remove(i);
            }
            // Only pinned groups left; never truncate those.
            None => break,
        }
    }
}

fn estimated_tokens(weighted: &[(&AttributePick, f64)]) -> usize {
    weighted
        .iter()
        .map(|(pick, _)| pick.value.split_whitespace().count() + GROUP_OVERHEAD_TOKENS)
        .sum()
}
