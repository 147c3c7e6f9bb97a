//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! - `ProfileProvider` - versioned attribute catalogs from the aggregated
//!   style profile
//! - `PromptCache` - single-flight, LRU-bounded prompt cache
//! - `DecisionStore` - decision retention backing out-of-order feedback
//! - `ProcessedEventStore` - at-most-once guard for feedback events
//! - `FeedbackSource` - asynchronous stream of feedback events
//! - `ImageGenerator` - the downstream image provider (black box)
//! - `BanditSnapshotStore` - fire-and-forget bandit state persistence

mod decision_store;
mod feedback_source;
mod image_generator;
mod processed_event_store;
mod profile_provider;
mod prompt_cache;
mod snapshot_store;

pub use decision_store::{DecisionStore, DecisionStoreError};
pub use feedback_source::FeedbackSource;
pub use image_generator::{ImageError, ImageGenerator, ImageHandle};
pub use processed_event_store::{EventStoreError, ProcessedEventStore};
pub use profile_provider::{ProfileError, ProfileProvider};
pub use prompt_cache::{CacheError, CacheOutcome, CachedPrompt, ComputeFuture, PromptCache};
pub use snapshot_store::{BanditSnapshotStore, SnapshotError};
