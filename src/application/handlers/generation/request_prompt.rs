//! RequestPrompt - the primary generation entry point.
//!
//! Pipeline: specificity analysis -> cache lookup -> on miss, bandit
//! selection and rendering inside the cache's single-flight compute. An
//! empty catalog degrades to the neutral decision; a generation request
//! never hard-fails because learning data is sparse.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::domain::bandit::BanditModel;
use crate::domain::foundation::{DecisionId, UserId};
use crate::domain::rendering::{PromptRenderer, RenderedPrompt, TokenBudget};
use crate::domain::selection::{
    Decision, DecisionFingerprint, GenerationConstraints, PromptSelector,
};
use crate::domain::specificity::{Descriptor, SpecificityAnalyzer, SpecificityReport};
use crate::ports::{
    CacheError, CachedPrompt, DecisionStore, ProfileError, ProfileProvider, PromptCache,
};

/// Command for one prompt request.
#[derive(Debug, Clone)]
pub struct RequestPromptCommand {
    pub user_id: UserId,
    /// The raw user command, e.g. "make me 10 dresses".
    pub raw_command: String,
    /// Descriptors parsed from the command by the upstream NLU step.
    pub descriptors: Vec<Descriptor>,
    /// How many images the user asked for.
    pub requested_count: u32,
    pub constraints: GenerationConstraints,
}

/// Result of a prompt request.
#[derive(Debug, Clone)]
pub struct PromptResponse {
    pub prompt: RenderedPrompt,
    /// Reference the caller hands back with feedback.
    pub decision_id: DecisionId,
    pub specificity: SpecificityReport,
    pub cache_hit: bool,
}

/// Errors a prompt request can surface.
///
/// Sparse learning data is not among them: an empty catalog degrades to a
/// neutral prompt instead of failing.
#[derive(Debug, Error)]
pub enum RequestPromptError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Handler for prompt requests.
pub struct RequestPromptHandler {
    profiles: Arc<dyn ProfileProvider>,
    cache: Arc<dyn PromptCache>,
    decisions: Arc<dyn DecisionStore>,
    analyzer: SpecificityAnalyzer,
    selector: PromptSelector,
    renderer: PromptRenderer,
    token_budget: TokenBudget,
    temperature_bucket: f64,
}

impl RequestPromptHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profiles: Arc<dyn ProfileProvider>,
        cache: Arc<dyn PromptCache>,
        decisions: Arc<dyn DecisionStore>,
        model: Arc<BanditModel>,
        analyzer: SpecificityAnalyzer,
        token_budget: TokenBudget,
        temperature_bucket: f64,
    ) -> Self {
        Self {
            profiles,
            cache,
            decisions,
            analyzer,
            selector: PromptSelector::new(model),
            renderer: PromptRenderer::new(),
            token_budget,
            temperature_bucket,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestPromptCommand,
    ) -> Result<PromptResponse, RequestPromptError> {
        let report =
            self.analyzer
                .analyze(&cmd.raw_command, &cmd.descriptors, cmd.requested_count);

        // The catalog version is part of the fingerprint, so the profile
        // read happens before the cache check.
        let catalog = self.profiles.attribute_catalog(&cmd.user_id).await?;

        let fingerprint = DecisionFingerprint::compute(
            cmd.user_id.clone(),
            catalog.version(),
            &cmd.constraints,
            report.temperature,
            self.temperature_bucket,
        );

        let compute = {
            let selector = self.selector.clone();
            let renderer = self.renderer.clone();
            let decisions = Arc::clone(&self.decisions);
            let user_id = cmd.user_id.clone();
            let constraints = cmd.constraints.clone();
            let budget = self.token_budget;
            let temperature = report.temperature;

            Box::new(move || -> crate::ports::ComputeFuture {
                Box::pin(async move {
                    let mut rng = ChaCha8Rng::from_entropy();
                    let decision = match selector.select(
                        &user_id,
                        &catalog,
                        &constraints,
                        temperature,
                        &mut rng,
                    ) {
                        Ok(decision) => decision,
                        Err(err) => {
                            tracing::warn!(
                                user = %user_id,
                                error = %err,
                                "No candidates in catalog; using neutral decision"
                            );
                            Decision::neutral(user_id.clone(), catalog.version(), temperature)
                        }
                    };

                    let prompt = renderer.render(&decision, &constraints, budget);

                    // Retained so feedback can resolve the decision after
                    // the cache entry is gone.
                    decisions
                        .save(decision.clone())
                        .await
                        .map_err(|e| CacheError::Compute(e.to_string()))?;

                    Ok(CachedPrompt { prompt, decision })
                })
            })
        };

        let outcome = self.cache.get_or_compute(fingerprint, compute).await?;
        let decision = &outcome.cached.decision;

        tracing::info!(
            user = %cmd.user_id,
            decision = %decision.id(),
            specificity = report.score,
            temperature = report.temperature,
            mode = ?report.mode,
            cache_hit = outcome.hit,
            picks = %picks_summary(decision),
            "Prompt request served"
        );

        Ok(PromptResponse {
            prompt: outcome.cached.prompt,
            decision_id: decision.id(),
            specificity: report,
            cache_hit: outcome.hit,
        })
    }
}

/// Compact "category=value[origin]" listing for the per-request log line.
fn picks_summary(decision: &Decision) -> String {
    decision
        .picks()
        .iter()
        .map(|pick| {
            let origin = match pick.origin {
                crate::domain::selection::PickOrigin::Pinned => "pinned",
                crate::domain::selection::PickOrigin::Exploit => "exploit",
                crate::domain::selection::PickOrigin::Explore => "explore",
            };
            format!("{}={}[{}]", pick.category, pick.value, origin)
        })
        .collect::<Vec<_>>()
        .join(",")
}
