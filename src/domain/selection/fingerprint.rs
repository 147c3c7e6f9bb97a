//! Cache identity of a decision request.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::catalog::ProfileVersion;
use crate::domain::foundation::UserId;

use super::GenerationConstraints;

/// Deterministic identity of the inputs that decide a cached prompt.
///
/// Temperature is bucketed (nearest multiple of the bucket width) so
/// near-identical requests collapse onto one cache key. Profile version is
/// part of the key, so a new profile snapshot naturally misses the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionFingerprint {
    user_id: UserId,
    profile_version: ProfileVersion,
    constraints_key: String,
    temperature_bucket: u32,
}

impl DecisionFingerprint {
    /// Computes the fingerprint for one request.
    ///
    /// `bucket_width` is clamped below at 0.01 so a misconfigured zero
    /// width cannot divide by zero.
    pub fn compute(
        user_id: UserId,
        profile_version: ProfileVersion,
        constraints: &GenerationConstraints,
        temperature: f64,
        bucket_width: f64,
    ) -> Self {
        let width = bucket_width.max(0.01);
        Self {
            user_id,
            profile_version,
            constraints_key: constraints.canonical_key(),
            temperature_bucket: (temperature / width).round().max(0.0) as u32,
        }
    }

    /// The user this fingerprint belongs to, for per-user invalidation.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Short stable digest for log lines.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for DecisionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/v{}/t{}#{:016x}",
            self.user_id,
            self.profile_version,
            self.temperature_bucket,
            self.digest()
        )
    }
}
