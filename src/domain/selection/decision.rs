//! The immutable output of one selection.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AttributeCategory, ProfileVersion};
use crate::domain::foundation::{DecisionId, Timestamp, UserId};

/// How a pick was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickOrigin {
    /// User pinned the value; no arm was consulted.
    Pinned,
    /// The arm with the highest posterior mean won.
    Exploit,
    /// Sampling variance or temperature noise let a lower-mean arm win.
    Explore,
}

/// One chosen value for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePick {
    pub category: AttributeCategory,
    pub value: String,
    pub origin: PickOrigin,
    /// Posterior mean of the chosen arm at draw time; `None` for pinned
    /// picks, which never touched an arm.
    pub posterior_mean: Option<f64>,
}

impl AttributePick {
    /// True iff this pick came from exploration.
    pub fn was_explore(&self) -> bool {
        self.origin == PickOrigin::Explore
    }

    /// True iff this pick was pinned by the user.
    pub fn is_pinned(&self) -> bool {
        self.origin == PickOrigin::Pinned
    }
}

/// One attribute-value combination drawn for a generation request.
///
/// Immutable once produced; feedback events reference decisions by id, so
/// the picks recorded here are what the learner maps outcomes back onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    id: DecisionId,
    user_id: UserId,
    profile_version: ProfileVersion,
    temperature: f64,
    picks: Vec<AttributePick>,
    created_at: Timestamp,
}

impl Decision {
    /// Assembles a decision from selector output.
    pub fn new(
        user_id: UserId,
        profile_version: ProfileVersion,
        temperature: f64,
        picks: Vec<AttributePick>,
    ) -> Self {
        Self {
            id: DecisionId::new(),
            user_id,
            profile_version,
            temperature,
            picks,
            created_at: Timestamp::now(),
        }
    }

    /// The neutral fallback used when no category has any candidate.
    ///
    /// Keeps generation requests from hard-failing on sparse profiles: the
    /// renderer still gets one generic garment pick to work with.
    pub fn neutral(user_id: UserId, profile_version: ProfileVersion, temperature: f64) -> Self {
        Self::new(
            user_id,
            profile_version,
            temperature,
            vec![AttributePick {
                category: AttributeCategory::Garment,
                value: "editorial look".to_string(),
                origin: PickOrigin::Exploit,
                posterior_mean: None,
            }],
        )
    }

    pub fn id(&self) -> DecisionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn profile_version(&self) -> ProfileVersion {
        self.profile_version
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn picks(&self) -> &[AttributePick] {
        &self.picks
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// The pick for a category, if that category made it into the decision.
    pub fn pick(&self, category: AttributeCategory) -> Option<&AttributePick> {
        self.picks.iter().find(|p| p.category == category)
    }

    /// Names of chosen values keyed by category, for logging.
    pub fn chosen_values(&self) -> Vec<(AttributeCategory, &str)> {
        self.picks
            .iter()
            .map(|p| (p.category, p.value.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(category: AttributeCategory, value: &str, origin: PickOrigin) -> AttributePick {
        AttributePick {
            category,
            value: value.to_string(),
            origin,
            posterior_mean: Some(0.5),
        }
    }

    #[test]
    fn lookup_by_category_finds_pick() {
        let decision = Decision::new(
            UserId::new("u1").unwrap(),
            ProfileVersion::initial(),
            0.7,
            vec![
                pick(AttributeCategory::Garment, "dress", PickOrigin::Exploit),
                pick(AttributeCategory::Color, "navy", PickOrigin::Explore),
            ],
        );

        assert_eq!(
            decision.pick(AttributeCategory::Color).unwrap().value,
            "navy"
        );
        assert!(decision.pick(AttributeCategory::Fabric).is_none());
    }

    #[test]
    fn explore_flags_follow_origin() {
        let p = pick(AttributeCategory::Color, "navy", PickOrigin::Explore);
        assert!(p.was_explore());
        assert!(!p.is_pinned());

        let p = pick(AttributeCategory::Color, "navy", PickOrigin::Pinned);
        assert!(p.is_pinned());
        assert!(!p.was_explore());
    }

    #[test]
    fn neutral_decision_always_has_a_pick() {
        let decision = Decision::neutral(
            UserId::new("u1").unwrap(),
            ProfileVersion::initial(),
            1.0,
        );
        assert!(!decision.picks().is_empty());
    }

    #[test]
    fn serializes_and_deserializes() {
        let decision = Decision::new(
            UserId::new("u1").unwrap(),
            ProfileVersion::initial(),
            0.7,
            vec![pick(AttributeCategory::Garment, "coat", PickOrigin::Exploit)],
        );

        let json = serde_json::to_string(&decision).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(decision, back);
    }
}
