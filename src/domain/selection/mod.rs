//! Prompt selection: drawing one attribute combination per request.
//!
//! The selector honors explicit user constraints first, then fills the
//! remaining categories from the bandit model at the temperature chosen by
//! the specificity analyzer. Its output, a [`Decision`], is immutable and is
//! the unit feedback refers back to.

mod constraints;
mod decision;
mod errors;
mod fingerprint;
mod selector;

pub use constraints::GenerationConstraints;
pub use decision::{AttributePick, Decision, PickOrigin};
pub use errors::SelectionError;
pub use fingerprint::DecisionFingerprint;
pub use selector::PromptSelector;
