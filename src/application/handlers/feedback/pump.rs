//! FeedbackPump - drains a feedback source into the submit handler.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};

use crate::domain::learning::FeedbackEvent;
use crate::ports::FeedbackSource;

use super::SubmitFeedbackHandler;

/// Consumes a feedback stream until it ends, applying each event.
///
/// Events may arrive out of order and duplicated; the submit handler
/// resolves and deduplicates, so the pump itself stays a thin loop. The
/// pump subscribes at construction and holds only the stream, so dropping
/// the producing side ends the run.
pub struct FeedbackPump {
    stream: Pin<Box<dyn Stream<Item = FeedbackEvent> + Send>>,
    handler: Arc<SubmitFeedbackHandler>,
}

impl FeedbackPump {
    pub fn new(source: &dyn FeedbackSource, handler: Arc<SubmitFeedbackHandler>) -> Self {
        Self {
            stream: source.subscribe(),
            handler,
        }
    }

    /// Runs until the stream ends; returns how many events were applied
    /// (duplicates and drops excluded).
    pub async fn run(mut self) -> usize {
        let mut applied = 0usize;

        while let Some(event) = self.stream.next().await {
            if self.handler.apply_event(event).await.was_applied() {
                applied += 1;
            }
        }

        tracing::info!(applied, "Feedback stream ended");
        applied
    }

    /// Spawns the pump on the current runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<usize> {
        tokio::spawn(self.run())
    }
}
