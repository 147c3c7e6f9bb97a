//! A single bandit arm: lock-free success/failure counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::BanditError;

/// Point-in-time view of an arm's counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmCounts {
    pub success: f64,
    pub failure: f64,
}

impl ArmCounts {
    /// Beta shape parameter alpha = success + 1; always >= 1.
    pub fn alpha(&self) -> f64 {
        self.success + 1.0
    }

    /// Beta shape parameter beta = failure + 1; always >= 1.
    pub fn beta(&self) -> f64 {
        self.failure + 1.0
    }

    /// Posterior mean alpha / (alpha + beta).
    pub fn posterior_mean(&self) -> f64 {
        self.alpha() / (self.alpha() + self.beta())
    }

    /// Total evidence observed for this arm.
    pub fn total(&self) -> f64 {
        self.success + self.failure
    }
}

impl Default for ArmCounts {
    fn default() -> Self {
        Self {
            success: 0.0,
            failure: 0.0,
        }
    }
}

/// Success/failure counters for one (user, category, value) arm.
///
/// Counters are f64 values stored as bit-patterns in atomics so a weighted
/// increment is a compare-and-swap rather than a lock. Counters are finite,
/// non-negative, and monotonically non-decreasing except under decay.
#[derive(Debug)]
pub struct BanditArm {
    success_bits: AtomicU64,
    failure_bits: AtomicU64,
}

impl BanditArm {
    /// Creates a fresh arm with zero counters (Beta(1, 1) prior).
    pub fn new() -> Self {
        Self::from_counts(ArmCounts::default())
    }

    /// Restores an arm from persisted counters.
    ///
    /// Invalid values (negative, non-finite) are clamped to zero so a
    /// corrupted snapshot cannot break the alpha/beta >= 1 invariant.
    pub fn from_counts(counts: ArmCounts) -> Self {
        Self {
            success_bits: AtomicU64::new(sanitize(counts.success).to_bits()),
            failure_bits: AtomicU64::new(sanitize(counts.failure).to_bits()),
        }
    }

    /// Reads the current counters.
    pub fn counts(&self) -> ArmCounts {
        ArmCounts {
            success: f64::from_bits(self.success_bits.load(Ordering::Acquire)),
            failure: f64::from_bits(self.failure_bits.load(Ordering::Acquire)),
        }
    }

    /// Atomically adds `weight` to the success or failure counter.
    ///
    /// The read-modify-write is a CAS loop; losing `max_attempts` races in a
    /// row raises [`BanditError::ConcurrentUpdateConflict`], which the
    /// learning loop logs rather than surfacing.
    pub fn record(
        &self,
        success: bool,
        weight: f64,
        max_attempts: u32,
    ) -> Result<ArmCounts, BanditError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(BanditError::InvalidWeight { weight });
        }

        let counter = if success {
            &self.success_bits
        } else {
            &self.failure_bits
        };

        for _ in 0..max_attempts {
            let current_bits = counter.load(Ordering::Acquire);
            let next = f64::from_bits(current_bits) + weight;
            if counter
                .compare_exchange(
                    current_bits,
                    next.to_bits(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return Ok(self.counts());
            }
        }

        Err(BanditError::ConcurrentUpdateConflict {
            attempts: max_attempts,
        })
    }

    /// Multiplies both counters by a decay factor in (0, 1].
    ///
    /// Caller must hold the owning user's exclusive gate; under that
    /// exclusion a plain store cannot race an update.
    pub fn scale(&self, factor: f64) -> Result<(), BanditError> {
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(BanditError::InvalidDecayFactor { factor });
        }

        let counts = self.counts();
        self.success_bits
            .store(sanitize(counts.success * factor).to_bits(), Ordering::Release);
        self.failure_bits
            .store(sanitize(counts.failure * factor).to_bits(), Ordering::Release);
        Ok(())
    }
}

impl Default for BanditArm {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
