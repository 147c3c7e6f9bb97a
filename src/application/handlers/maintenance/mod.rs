//! Maintenance handlers.

mod decay_arms;

pub use decay_arms::{DecayArmsCommand, DecayArmsHandler, DecayResult};
