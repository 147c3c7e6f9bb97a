//! Generation handlers.

mod request_prompt;

pub use request_prompt::{
    PromptResponse, RequestPromptCommand, RequestPromptError, RequestPromptHandler,
};
