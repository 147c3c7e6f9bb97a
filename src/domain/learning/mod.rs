//! Feedback-driven learning: mapping user reactions back onto bandit arms.
//!
//! Events flow received -> validated -> applied -> cache-invalidated. The
//! learner owns the first three phases; the feedback handler performs the
//! cache invalidation right after a successful apply.

mod errors;
mod event;
mod learner;
mod result;

pub use errors::LearningError;
pub use event::{CritiqueDelta, FeedbackEvent, FeedbackOutcome};
pub use learner::{AppliedFeedback, FeedbackLearner, LearningWeights};
pub use result::LearningResult;
