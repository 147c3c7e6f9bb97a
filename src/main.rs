//! Demo binary: wires the engine with in-memory adapters and walks one
//! request/feedback/request cycle so the learning loop is visible in logs.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use styleforge::adapters::{
    ChannelFeedbackSource, InMemoryDecisionStore, InMemoryProcessedEventStore,
    InMemoryPromptCache, InMemorySnapshotStore, MockImageGenerator, StaticProfileProvider,
};
use styleforge::application::handlers::{
    DecayArmsCommand, DecayArmsHandler, FeedbackPump, RequestPromptCommand,
    RequestPromptHandler, SubmitFeedbackCommand, SubmitFeedbackHandler,
};
use styleforge::config::EngineConfig;
use styleforge::domain::bandit::BanditModel;
use styleforge::domain::catalog::{AttributeCatalog, ProfileVersion};
use styleforge::domain::foundation::UserId;
use styleforge::domain::learning::{FeedbackEvent, FeedbackLearner, FeedbackOutcome};
use styleforge::domain::selection::GenerationConstraints;
use styleforge::domain::specificity::{Descriptor, DescriptorKind, SpecificityAnalyzer};
use styleforge::ports::{
    BanditSnapshotStore, DecisionStore, ImageGenerator, ProfileProvider, PromptCache,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::load()?;
    config.validate()?;

    // Shared engine state.
    let model = Arc::new(BanditModel::new(
        config.bandit.shard_count,
        config.bandit.max_cas_attempts,
        config.bandit.noise_scale,
    ));
    let cache: Arc<dyn PromptCache> = Arc::new(InMemoryPromptCache::new(config.cache.capacity));
    let decisions: Arc<dyn DecisionStore> =
        Arc::new(InMemoryDecisionStore::new(config.learning.decision_retention));
    let snapshots: Arc<dyn BanditSnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let profiles = Arc::new(StaticProfileProvider::new());

    // A demo user whose portfolio yielded a small catalog.
    let user = UserId::new("demo-user")?;
    let catalog = AttributeCatalog::from_external(
        ProfileVersion::initial(),
        vec![
            (
                "garment".to_string(),
                vec!["slip dress".to_string(), "trench coat".to_string()],
            ),
            (
                "fabric".to_string(),
                vec!["silk".to_string(), "wool".to_string()],
            ),
            (
                "color".to_string(),
                vec!["navy".to_string(), "ivory".to_string()],
            ),
            (
                "style_context".to_string(),
                vec!["evening".to_string(), "street".to_string()],
            ),
        ],
    )?;
    profiles.set_catalog(user.clone(), catalog).await;

    let request_handler = RequestPromptHandler::new(
        Arc::clone(&profiles) as Arc<dyn ProfileProvider>,
        Arc::clone(&cache),
        Arc::clone(&decisions),
        Arc::clone(&model),
        SpecificityAnalyzer::new(config.specificity.temperature_range()?),
        config.renderer.budget()?,
        config.cache.temperature_bucket,
    );

    let feedback_handler = Arc::new(SubmitFeedbackHandler::new(
        Arc::clone(&model),
        FeedbackLearner::new(Arc::clone(&model), config.learning.weights()),
        Arc::clone(&decisions),
        Arc::new(InMemoryProcessedEventStore::new()),
        Arc::clone(&cache),
        Arc::clone(&snapshots),
    ));

    // Feedback arrives through a stream, as it would from the product UI.
    let source = ChannelFeedbackSource::new();
    let pump = FeedbackPump::new(&source, Arc::clone(&feedback_handler)).spawn();

    let generator = MockImageGenerator::new();

    // 1. A vague request runs hot.
    let response = request_handler
        .handle(RequestPromptCommand {
            user_id: user.clone(),
            raw_command: "surprise me with some looks".to_string(),
            descriptors: vec![],
            requested_count: 4,
            constraints: GenerationConstraints::none(),
        })
        .await?;
    let image = generator.generate(&user, &response.prompt).await?;
    tracing::info!(prompt = %response.prompt.text(), image = %image.image_id, "Generated");

    // 2. The user likes it; the bandit learns before the next request.
    let learned = feedback_handler
        .handle(SubmitFeedbackCommand {
            user_id: user.clone(),
            decision_id: response.decision_id,
            outcome: FeedbackOutcome::Like,
            critique: vec![],
        })
        .await?;
    tracing::info!(result = ?learned, "Feedback handled");

    // An implicit save signal arrives later through the stream.
    source.publish(FeedbackEvent::new(
        user.clone(),
        response.decision_id,
        FeedbackOutcome::Save,
        vec![],
    )?);

    // 3. A specific request runs cold and reflects the update.
    let response = request_handler
        .handle(RequestPromptCommand {
            user_id: user.clone(),
            raw_command: "exactly one fitted silk slip dress".to_string(),
            descriptors: vec![
                Descriptor::new(DescriptorKind::Fabric, "silk"),
                Descriptor::new(DescriptorKind::Modifier, "fitted"),
            ],
            requested_count: 1,
            constraints: GenerationConstraints::none(),
        })
        .await?;
    let image = generator.generate(&user, &response.prompt).await?;
    tracing::info!(prompt = %response.prompt.text(), image = %image.image_id, "Generated");

    // 4. A decay pass ages the learned counters.
    let decay = DecayArmsHandler::new(
        Arc::clone(&model),
        Arc::clone(&cache),
        snapshots,
        config.bandit.decay_factor,
    );
    decay
        .handle(DecayArmsCommand {
            user_id: user.clone(),
        })
        .await?;

    drop(source);
    let applied = pump.await?;
    tracing::info!(feedback_applied = applied, "Demo complete");

    Ok(())
}
