use crate::models::{DecisionPolicy, Status, VerificationOutcome};

/// Turns a representative score and classification label into the terminal
/// Verified/Rejected outcome. Two terminal states, no intermediates; the
/// threshold and labels come from the policy table.
pub struct DecisionEngine {
    policy: DecisionPolicy,
}

impl DecisionEngine {
    pub fn new(policy: DecisionPolicy) -> Self {
        DecisionEngine { policy }
    }

    pub fn decide(&self, score: f64, classification: &str) -> VerificationOutcome {
        // A document flagged as the wrong type is rejected outright; the score
        // never overrides the classifier.
        if classification == self.policy.non_target_label {
            return VerificationOutcome {
                status: Status::Rejected,
                remark: self.policy.non_target_remark.clone(),
                document_type: classification.to_string(),
                score,
                overridden: true,
            };
        }

        if score >= self.policy.verify_threshold {
            VerificationOutcome {
                status: Status::Verified,
                remark: self.policy.matched_remark.clone(),
                document_type: classification.to_string(),
                score,
                overridden: false,
            }
        } else {
            VerificationOutcome {
                status: Status::Rejected,
                remark: self.policy.low_score_remark.clone(),
                document_type: classification.to_string(),
                score,
                overridden: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DecisionEngine {
        DecisionEngine::new(DecisionPolicy::default())
    }

    #[test]
    fn threshold_splits_verified_and_rejected() {
        let outcome = engine().decide(85.0, "Aadhaar");
        assert_eq!(outcome.status, Status::Verified);
        assert_eq!(outcome.remark, "Matched");

        let outcome = engine().decide(84.99, "Aadhaar");
        assert_eq!(outcome.status, Status::Rejected);
        assert_eq!(outcome.remark, "Low match score");
    }

    #[test]
    fn non_target_classification_overrides_any_score() {
        for score in [0.0, 50.0, 99.0, 100.0] {
            let outcome = engine().decide(score, "Non-Aadhaar");
            assert_eq!(outcome.status, Status::Rejected);
            assert_eq!(outcome.remark, "Non Aadhaar");
            assert_eq!(outcome.document_type, "Non-Aadhaar");
            assert_eq!(outcome.score, score);
            assert!(outcome.overridden);
        }
    }

    #[test]
    fn unknown_labels_pass_through_verbatim() {
        let outcome = engine().decide(90.0, "Voter-ID");
        assert_eq!(outcome.status, Status::Verified);
        assert_eq!(outcome.document_type, "Voter-ID");
    }
}
