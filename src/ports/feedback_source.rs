//! FeedbackSource port - asynchronous feedback event delivery.
//!
//! Explicit actions (like, save, critique) and implicit interaction signals
//! arrive from the product surface as a stream. Delivery may be
//! out-of-order relative to the decisions being referenced and may contain
//! duplicates; the submit path resolves and deduplicates.

use std::pin::Pin;

use futures::Stream;

use crate::domain::learning::FeedbackEvent;

/// Port for subscribing to incoming feedback events.
pub trait FeedbackSource: Send + Sync {
    /// Returns the stream of feedback events.
    ///
    /// The stream ends when the producing side shuts down; implementations
    /// decide whether `subscribe` may be called more than once.
    fn subscribe(&self) -> Pin<Box<dyn Stream<Item = FeedbackEvent> + Send>>;
}
