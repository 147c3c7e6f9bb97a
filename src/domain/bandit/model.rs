//! Sharded per-user bandit state and Thompson Sampling draws.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AttributeCategory, AttributeValue};
use crate::domain::foundation::{Timestamp, UserId};

use super::{sample_beta, ArmCounts, BanditArm, BanditError};

/// Posterior-mean ties within this tolerance count as "the maximum", so a
/// cold-start draw over identical arms is not misreported as exploration.
const MEAN_TIE_EPSILON: f64 = 1e-9;

type ArmKey = (AttributeCategory, String);

/// One value chosen by a Thompson draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledValue {
    pub value: AttributeValue,
    /// True iff the winner's posterior mean was not the maximum among the
    /// candidates, i.e. exploration noise or sampling variance won.
    pub was_explore: bool,
    /// The winner's posterior mean at draw time.
    pub posterior_mean: f64,
}

/// Persisted view of one arm, for the snapshot collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmSnapshot {
    pub category: AttributeCategory,
    pub value: String,
    pub success: f64,
    pub failure: f64,
}

/// Serializable snapshot of one user's entire bandit state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanditSnapshot {
    pub user_id: UserId,
    pub taken_at: Timestamp,
    pub arms: Vec<ArmSnapshot>,
}

/// Arm table for one user, behind the decay/update gate.
///
/// Outcome recording holds the gate shared (arms update independently via
/// CAS); decay holds it exclusively, so a decay pass and an update for the
/// same user never interleave.
#[derive(Debug, Default)]
struct UserArms {
    gate: RwLock<HashMap<ArmKey, Arc<BanditArm>>>,
}

impl UserArms {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ArmKey, Arc<BanditArm>>> {
        self.gate.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ArmKey, Arc<BanditArm>>> {
        self.gate.write().unwrap_or_else(|e| e.into_inner())
    }
}

type Shard = RwLock<HashMap<UserId, Arc<UserArms>>>;

/// Per-user bandit model, sharded by user id.
///
/// The shard map only grows (users are never evicted here); all hot-path
/// locking is per-shard or per-user, never global.
#[derive(Debug)]
pub struct BanditModel {
    shards: Box<[Shard]>,
    max_cas_attempts: u32,
    noise_scale: f64,
}

impl BanditModel {
    /// Creates a model with explicit tuning parameters.
    pub fn new(shard_count: usize, max_cas_attempts: u32, noise_scale: f64) -> Self {
        let shard_count = shard_count.max(1);
        Self {
            shards: (0..shard_count)
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
            max_cas_attempts: max_cas_attempts.max(1),
            noise_scale: noise_scale.max(0.0),
        }
    }

    /// Creates a model with the default tuning (16 shards).
    pub fn with_defaults() -> Self {
        Self::new(16, 16, 0.35)
    }

    /// Draws one value from the candidates via Thompson Sampling.
    ///
    /// Every candidate's arm is created lazily on first draw. Each arm's
    /// Beta(success+1, failure+1) sample gets independent uniform noise
    /// scaled by `temperature`; the argmax wins. Returns `None` for an
    /// empty candidate list (the selector omits such categories).
    pub fn sample_value<R: Rng + ?Sized>(
        &self,
        user: &UserId,
        category: AttributeCategory,
        candidates: &[AttributeValue],
        temperature: f64,
        rng: &mut R,
    ) -> Option<SampledValue> {
        if candidates.is_empty() {
            return None;
        }

        let arms: Vec<(usize, ArmCounts)> = candidates
            .iter()
            .enumerate()
            .map(|(i, value)| (i, self.arm(user, category, value.name()).counts()))
            .collect();

        let max_mean = arms
            .iter()
            .map(|(_, c)| c.posterior_mean())
            .fold(f64::NEG_INFINITY, f64::max);

        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, counts) in &arms {
            let draw = sample_beta(counts.alpha(), counts.beta(), rng);
            let noise = temperature * self.noise_scale * rng.gen::<f64>();
            let score = draw + noise;
            if score > best_score {
                best_score = score;
                best_index = *i;
            }
        }

        let chosen_mean = arms[best_index].1.posterior_mean();
        Some(SampledValue {
            value: candidates[best_index].clone(),
            was_explore: chosen_mean + MEAN_TIE_EPSILON < max_mean,
            posterior_mean: chosen_mean,
        })
    }

    /// Adds a weighted success or failure to one arm.
    ///
    /// Holds the user's gate shared for the duration of the CAS, so a decay
    /// pass (exclusive gate) can never interleave with the update.
    pub fn record_outcome(
        &self,
        user: &UserId,
        category: AttributeCategory,
        value: &str,
        success: bool,
        weight: f64,
    ) -> Result<ArmCounts, BanditError> {
        let user_arms = self.user_arms(user);
        let key: ArmKey = (category, value.to_string());

        loop {
            {
                let map = user_arms.read();
                if let Some(arm) = map.get(&key) {
                    return arm.record(success, weight, self.max_cas_attempts);
                }
            }
            let mut map = user_arms.write();
            map.entry(key.clone()).or_default();
        }
    }

    /// Reads an arm's counters without creating it.
    pub fn counts(
        &self,
        user: &UserId,
        category: AttributeCategory,
        value: &str,
    ) -> Option<ArmCounts> {
        let user_arms = self.existing_user_arms(user)?;
        let map = user_arms.read();
        map.get(&(category, value.to_string())).map(|a| a.counts())
    }

    /// Multiplies all of a user's counters by `factor`, letting stale
    /// preferences fade. Exclusive with concurrent outcome updates for the
    /// same user. Returns the number of arms decayed.
    pub fn decay(&self, user: &UserId, factor: f64) -> Result<usize, BanditError> {
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(BanditError::InvalidDecayFactor { factor });
        }

        let Some(user_arms) = self.existing_user_arms(user) else {
            return Ok(0);
        };

        let map = user_arms.write();
        for arm in map.values() {
            arm.scale(factor)?;
        }
        Ok(map.len())
    }

    /// Captures a user's arm counters for the persistence collaborator.
    ///
    /// Arms are sorted by (category, value) so snapshots are stable.
    pub fn snapshot(&self, user: &UserId) -> BanditSnapshot {
        let mut arms = Vec::new();
        if let Some(user_arms) = self.existing_user_arms(user) {
            let map = user_arms.read();
            for ((category, value), arm) in map.iter() {
                let counts = arm.counts();
                arms.push(ArmSnapshot {
                    category: *category,
                    value: value.clone(),
                    success: counts.success,
                    failure: counts.failure,
                });
            }
        }
        arms.sort_by(|a, b| (a.category, &a.value).cmp(&(b.category, &b.value)));

        BanditSnapshot {
            user_id: user.clone(),
            taken_at: Timestamp::now(),
            arms,
        }
    }

    /// Rebuilds a user's arms from a persisted snapshot.
    ///
    /// Counter invariants survive restarts: invalid persisted values are
    /// clamped to zero by [`BanditArm::from_counts`].
    pub fn restore(&self, snapshot: &BanditSnapshot) {
        let user_arms = self.user_arms(&snapshot.user_id);
        let mut map = user_arms.write();
        map.clear();
        for arm in &snapshot.arms {
            map.insert(
                (arm.category, arm.value.clone()),
                Arc::new(BanditArm::from_counts(ArmCounts {
                    success: arm.success,
                    failure: arm.failure,
                })),
            );
        }
    }

    /// Gets (or lazily creates) one arm.
    fn arm(&self, user: &UserId, category: AttributeCategory, value: &str) -> Arc<BanditArm> {
        let user_arms = self.user_arms(user);
        let key: ArmKey = (category, value.to_string());
        {
            let map = user_arms.read();
            if let Some(arm) = map.get(&key) {
                return Arc::clone(arm);
            }
        }
        let mut map = user_arms.write();
        Arc::clone(map.entry(key).or_default())
    }

    fn user_arms(&self, user: &UserId) -> Arc<UserArms> {
        let shard = &self.shards[self.shard_index(user)];
        {
            let map = shard.read().unwrap_or_else(|e| e.into_inner());
            if let Some(arms) = map.get(user) {
                return Arc::clone(arms);
            }
        }
        let mut map = shard.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(map.entry(user.clone()).or_default())
    }

    fn existing_user_arms(&self, user: &UserId) -> Option<Arc<UserArms>> {
        let shard = &self.shards[self.shard_index(user)];
        let map = shard.read().unwrap_or_else(|e| e.into_inner());
        map.get(user).map(Arc::clone)
    }

    fn shard_index(&self, user: &UserId) -> usize {
        let mut hasher = DefaultHasher::new();
        user.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }
}
