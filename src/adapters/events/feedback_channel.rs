//! Channel-backed feedback source.

use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::domain::learning::FeedbackEvent;
use crate::ports::FeedbackSource;

/// Feedback source fed through an unbounded channel.
///
/// The product surface (or a test) pushes events through [`publish`];
/// the feedback pump consumes the subscribed stream. Single-consumer: the
/// receiver can be taken once, later `subscribe` calls get an empty stream.
///
/// [`publish`]: ChannelFeedbackSource::publish
pub struct ChannelFeedbackSource {
    sender: mpsc::UnboundedSender<FeedbackEvent>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<FeedbackEvent>>>,
}

impl ChannelFeedbackSource {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// Delivers an event to the subscriber; returns false once the
    /// subscriber is gone.
    pub fn publish(&self, event: FeedbackEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

impl Default for ChannelFeedbackSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackSource for ChannelFeedbackSource {
    fn subscribe(&self) -> Pin<Box<dyn Stream<Item = FeedbackEvent> + Send>> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match receiver {
            Some(receiver) => Box::pin(ReceiverStream { receiver }),
            None => Box::pin(futures::stream::empty()),
        }
    }
}

/// Minimal Stream wrapper over a tokio mpsc receiver.
struct ReceiverStream {
    receiver: mpsc::UnboundedReceiver<FeedbackEvent>,
}

impl Stream for ReceiverStream {
    type Item = FeedbackEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
