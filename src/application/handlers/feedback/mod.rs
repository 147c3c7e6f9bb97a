//! Feedback handlers.

mod pump;
mod submit_feedback;

pub use pump::FeedbackPump;
pub use submit_feedback::{SubmitFeedbackCommand, SubmitFeedbackHandler};
