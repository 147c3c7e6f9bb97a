//! Applying feedback events to the bandit model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::bandit::BanditModel;
use crate::domain::catalog::AttributeCategory;
use crate::domain::selection::Decision;

use super::{FeedbackEvent, FeedbackOutcome, LearningError};

/// Update weights per outcome kind.
///
/// A critique names a replacement explicitly, which is a much stronger
/// signal than a bare like, hence the heavier default success weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningWeights {
    pub like: f64,
    pub dislike: f64,
    pub critique_success: f64,
    pub critique_failure: f64,
}

impl Default for LearningWeights {
    fn default() -> Self {
        Self {
            like: 1.0,
            dislike: 1.0,
            critique_success: 3.0,
            critique_failure: 1.0,
        }
    }
}

/// Summary of a successfully applied event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedFeedback {
    pub arm_updates: usize,
}

/// One planned counter update; planning is separated from applying so an
/// invalid event is rejected before any counter moves.
#[derive(Debug, Clone, PartialEq)]
struct ArmUpdate {
    category: AttributeCategory,
    value: String,
    success: bool,
    weight: f64,
}

/// Maps feedback outcomes onto bandit arm updates.
pub struct FeedbackLearner {
    model: Arc<BanditModel>,
    weights: LearningWeights,
}

impl FeedbackLearner {
    pub fn new(model: Arc<BanditModel>, weights: LearningWeights) -> Self {
        Self { model, weights }
    }

    /// Validates an event against its decision, then applies every planned
    /// arm update.
    ///
    /// Validation happens entirely before the first counter moves, so a
    /// rejected event leaves the model untouched. Pinned picks never
    /// produce updates: no arm was consulted for them.
    pub fn apply(
        &self,
        event: &FeedbackEvent,
        decision: &Decision,
    ) -> Result<AppliedFeedback, LearningError> {
        self.validate(event, decision)?;
        let plan = self.plan(event, decision);

        for update in &plan {
            self.model.record_outcome(
                event.user_id(),
                update.category,
                &update.value,
                update.success,
                update.weight,
            )?;
        }

        Ok(AppliedFeedback {
            arm_updates: plan.len(),
        })
    }

    fn validate(&self, event: &FeedbackEvent, decision: &Decision) -> Result<(), LearningError> {
        if event.decision_id() != decision.id() || event.user_id() != decision.user_id() {
            return Err(LearningError::InvalidFeedbackReference {
                decision_id: event.decision_id(),
            });
        }

        for delta in event.critique() {
            if decision.pick(delta.category).is_none() {
                return Err(LearningError::CritiqueTargetMissing {
                    category: delta.category,
                });
            }
        }

        Ok(())
    }

    fn plan(&self, event: &FeedbackEvent, decision: &Decision) -> Vec<ArmUpdate> {
        match event.outcome() {
            FeedbackOutcome::Like | FeedbackOutcome::Save => {
                self.blanket_updates(decision, true, self.weights.like)
            }
            FeedbackOutcome::Dislike => {
                self.blanket_updates(decision, false, self.weights.dislike)
            }
            FeedbackOutcome::Critique => {
                let mut updates = Vec::new();
                for delta in event.critique() {
                    updates.push(ArmUpdate {
                        category: delta.category,
                        value: delta.new_value.clone(),
                        success: true,
                        weight: self.weights.critique_success,
                    });

                    // Validated above, so the pick exists.
                    if let Some(old) = decision.pick(delta.category) {
                        if !old.is_pinned() {
                            updates.push(ArmUpdate {
                                category: delta.category,
                                value: old.value.clone(),
                                success: false,
                                weight: self.weights.critique_failure,
                            });
                        }
                    }
                }
                updates
            }
        }
    }

    fn blanket_updates(&self, decision: &Decision, success: bool, weight: f64) -> Vec<ArmUpdate> {
        decision
            .picks()
            .iter()
            .filter(|pick| !pick.is_pinned())
            .map(|pick| ArmUpdate {
                category: pick.category,
                value: pick.value.clone(),
                success,
                weight,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProfileVersion;
    use crate::domain::foundation::UserId;
    use crate::domain::learning::CritiqueDelta;
    use crate::domain::selection::{AttributePick, PickOrigin};

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn pick(category: AttributeCategory, value: &str, origin: PickOrigin) -> AttributePick {
        AttributePick {
            category,
            value: value.to_string(),
            origin,
            posterior_mean: Some(0.5),
        }
    }

    fn decision() -> Decision {
        Decision::new(
            user(),
            ProfileVersion::initial(),
            0.7,
            vec![
                pick(AttributeCategory::Garment, "dress", PickOrigin::Exploit),
                pick(AttributeCategory::Fabric, "denim", PickOrigin::Explore),
                pick(AttributeCategory::Color, "navy", PickOrigin::Pinned),
            ],
        )
    }

    fn learner(model: &Arc<BanditModel>) -> FeedbackLearner {
        FeedbackLearner::new(Arc::clone(model), LearningWeights::default())
    }

    #[test]
    fn like_credits_every_unpinned_pick() {
        let model = Arc::new(BanditModel::with_defaults());
        let d = decision();
        let event =
            FeedbackEvent::new(user(), d.id(), FeedbackOutcome::Like, vec![]).unwrap();

        let applied = learner(&model).apply(&event, &d).unwrap();

        assert_eq!(applied.arm_updates, 2);
        let counts = model
            .counts(&user(), AttributeCategory::Garment, "dress")
            .unwrap();
        assert_eq!(counts.success, 1.0);
        // Pinned color pick never touched an arm.
        assert!(model
            .counts(&user(), AttributeCategory::Color, "navy")
            .is_none());
    }

    #[test]
    fn dislike_records_failures() {
        let model = Arc::new(BanditModel::with_defaults());
        let d = decision();
        let event =
            FeedbackEvent::new(user(), d.id(), FeedbackOutcome::Dislike, vec![]).unwrap();

        learner(&model).apply(&event, &d).unwrap();

        let counts = model
            .counts(&user(), AttributeCategory::Fabric, "denim")
            .unwrap();
        assert_eq!(counts.failure, 1.0);
        assert_eq!(counts.success, 0.0);
    }

    #[test]
    fn critique_shifts_weight_to_the_new_value() {
        let model = Arc::new(BanditModel::with_defaults());
        let d = decision();
        let event = FeedbackEvent::new(
            user(),
            d.id(),
            FeedbackOutcome::Critique,
            vec![CritiqueDelta::new(AttributeCategory::Fabric, "silk").unwrap()],
        )
        .unwrap();

        let applied = learner(&model).apply(&event, &d).unwrap();
        assert_eq!(applied.arm_updates, 2);

        let new_counts = model
            .counts(&user(), AttributeCategory::Fabric, "silk")
            .unwrap();
        assert_eq!(new_counts.success, 3.0);

        let old_counts = model
            .counts(&user(), AttributeCategory::Fabric, "denim")
            .unwrap();
        assert_eq!(old_counts.failure, 1.0);

        // Unrelated categories stay untouched.
        assert!(model
            .counts(&user(), AttributeCategory::Garment, "dress")
            .is_none());
    }

    #[test]
    fn critique_on_pinned_category_skips_the_old_arm() {
        let model = Arc::new(BanditModel::with_defaults());
        let d = decision();
        let event = FeedbackEvent::new(
            user(),
            d.id(),
            FeedbackOutcome::Critique,
            vec![CritiqueDelta::new(AttributeCategory::Color, "oxblood").unwrap()],
        )
        .unwrap();

        let applied = learner(&model).apply(&event, &d).unwrap();

        // Success on the new value only; the pinned old value has no arm.
        assert_eq!(applied.arm_updates, 1);
        assert!(model
            .counts(&user(), AttributeCategory::Color, "navy")
            .is_none());
    }

    #[test]
    fn mismatched_decision_is_rejected_before_any_update() {
        let model = Arc::new(BanditModel::with_defaults());
        let d = decision();
        let other = Decision::new(
            user(),
            ProfileVersion::initial(),
            0.7,
            vec![pick(AttributeCategory::Garment, "coat", PickOrigin::Exploit)],
        );
        let event =
            FeedbackEvent::new(user(), other.id(), FeedbackOutcome::Like, vec![]).unwrap();

        let err = learner(&model).apply(&event, &d).unwrap_err();
        assert!(matches!(
            err,
            LearningError::InvalidFeedbackReference { .. }
        ));
        assert!(model
            .counts(&user(), AttributeCategory::Garment, "dress")
            .is_none());
    }

    #[test]
    fn critique_against_missing_category_is_rejected_atomically() {
        let model = Arc::new(BanditModel::with_defaults());
        let d = decision();
        let event = FeedbackEvent::new(
            user(),
            d.id(),
            FeedbackOutcome::Critique,
            vec![
                CritiqueDelta::new(AttributeCategory::Fabric, "silk").unwrap(),
                CritiqueDelta::new(AttributeCategory::Silhouette, "a-line").unwrap(),
            ],
        )
        .unwrap();

        let err = learner(&model).apply(&event, &d).unwrap_err();
        assert!(matches!(err, LearningError::CritiqueTargetMissing { .. }));

        // The valid fabric delta must not have been applied either.
        assert!(model
            .counts(&user(), AttributeCategory::Fabric, "silk")
            .is_none());
    }
}
