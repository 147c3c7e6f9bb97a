//! Profile version value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Version of the aggregated style profile a catalog was derived from.
///
/// A new profile snapshot bumps the version, which changes every cache
/// fingerprint for that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileVersion(u32);

impl ProfileVersion {
    /// Create initial version (1).
    pub fn initial() -> Self {
        Self(1)
    }

    /// Create from value; versions start at 1.
    pub fn from_u32(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::out_of_range(
                "profile_version",
                1.0,
                u32::MAX as f64,
                0.0,
            ));
        }
        Ok(Self(value))
    }

    /// Increment version.
    pub fn increment(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get inner value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for ProfileVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_version_is_one() {
        assert_eq!(ProfileVersion::initial().as_u32(), 1);
    }

    #[test]
    fn zero_version_is_rejected() {
        assert!(ProfileVersion::from_u32(0).is_err());
    }

    #[test]
    fn increment_bumps_by_one() {
        let v = ProfileVersion::initial().increment();
        assert_eq!(v.as_u32(), 2);
    }
}
