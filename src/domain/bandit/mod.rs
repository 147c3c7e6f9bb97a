//! Per-user multi-armed bandit over fashion attribute values.
//!
//! Each (user, category, value) arm keeps Beta-distribution success/failure
//! counters updated by the feedback loop. Selection uses Thompson Sampling
//! with temperature-scaled exploration noise, so one policy covers the whole
//! exploit-to-explore range.
//!
//! Concurrency layout: user tables are sharded by user id hash so lock
//! contention stays local to a user's own traffic. Within a user, arm
//! counters are f64 bit-patterns in atomics updated by CAS; the per-user
//! RwLock gate is held shared by outcome updates and exclusively by decay,
//! which keeps decay and updates from interleaving.

mod arm;
mod beta;
mod errors;
mod model;

pub use arm::{ArmCounts, BanditArm};
pub use beta::sample_beta;
pub use errors::BanditError;
pub use model::{ArmSnapshot, BanditModel, BanditSnapshot, SampledValue};
