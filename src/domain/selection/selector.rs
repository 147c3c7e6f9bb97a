//! Drawing a decision from constraints, catalog, and bandit model.

use std::sync::Arc;

use rand::Rng;

use crate::domain::bandit::BanditModel;
use crate::domain::catalog::{AttributeCatalog, AttributeCategory};
use crate::domain::foundation::UserId;

use super::{AttributePick, Decision, GenerationConstraints, PickOrigin, SelectionError};

/// Chooses one attribute-value combination per generation request.
#[derive(Debug, Clone)]
pub struct PromptSelector {
    model: Arc<BanditModel>,
}

impl PromptSelector {
    pub fn new(model: Arc<BanditModel>) -> Self {
        Self { model }
    }

    /// Draws a [`Decision`] for a user.
    ///
    /// Pinned categories use the constraint value directly; the rest are
    /// Thompson draws over the catalog candidates. Categories with no
    /// candidates are omitted. Only when *every* category ends up empty is
    /// [`SelectionError::NoCandidates`] returned; the application layer
    /// substitutes the neutral decision in that case.
    pub fn select<R: Rng + ?Sized>(
        &self,
        user: &UserId,
        catalog: &AttributeCatalog,
        constraints: &GenerationConstraints,
        temperature: f64,
        rng: &mut R,
    ) -> Result<Decision, SelectionError> {
        let mut picks = Vec::new();

        for category in AttributeCategory::ALL {
            if let Some(pinned) = constraints.pinned_value(category) {
                picks.push(AttributePick {
                    category,
                    value: pinned.to_string(),
                    origin: PickOrigin::Pinned,
                    posterior_mean: None,
                });
                continue;
            }

            let candidates = catalog.values(category);
            if candidates.is_empty() {
                continue;
            }

            if let Some(drawn) =
                self.model
                    .sample_value(user, category, candidates, temperature, rng)
            {
                picks.push(AttributePick {
                    category,
                    value: drawn.value.name().to_string(),
                    origin: if drawn.was_explore {
                        PickOrigin::Explore
                    } else {
                        PickOrigin::Exploit
                    },
                    posterior_mean: Some(drawn.posterior_mean),
                });
            }
        }

        if picks.is_empty() {
            return Err(SelectionError::NoCandidates);
        }

        Ok(Decision::new(
            user.clone(),
            catalog.version(),
            temperature,
            picks,
        ))
    }
}
