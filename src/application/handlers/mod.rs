//! Command handlers.
//!
//! - `generation` - the primary prompt request path
//! - `feedback` - feedback submission and the stream pump
//! - `maintenance` - on-demand decay passes

pub mod feedback;
pub mod generation;
pub mod maintenance;

pub use feedback::{FeedbackPump, SubmitFeedbackCommand, SubmitFeedbackHandler};
pub use generation::{
    PromptResponse, RequestPromptCommand, RequestPromptError, RequestPromptHandler,
};
pub use maintenance::{DecayArmsCommand, DecayArmsHandler, DecayResult};
