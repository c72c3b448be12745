use std::collections::HashMap;

use strsim::normalized_levenshtein;

use crate::matching::similarity::{score_with_retry, SimilarityScorer};
use crate::matching::states;
use crate::models::{ExtractedFields, GroundTruthRow, MatchScoreSet, RetryPolicy, TRACKED_FIELDS};

/// Lowercase and collapse inner whitespace so comparisons ignore case and
/// formatting noise.
fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Local fuzzy similarity in [0, 100] between two normalized strings.
fn local_score(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Scores an extracted field map against one ground-truth row, field by field.
/// The remote scorer, when present, refines each field score; it is never
/// allowed to block or fail a comparison.
pub struct FieldMatcher {
    scorer: Option<Box<dyn SimilarityScorer>>,
    retry: RetryPolicy,
}

impl FieldMatcher {
    pub fn new(scorer: Option<Box<dyn SimilarityScorer>>, retry: RetryPolicy) -> Self {
        FieldMatcher { scorer, retry }
    }

    pub fn local_only() -> Self {
        FieldMatcher {
            scorer: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Per-field scores plus the overall arithmetic mean of every field that
    /// was actually compared. Fields empty on both sides are excluded so
    /// absent optional columns never penalize the mean.
    pub fn score(&self, extracted: &ExtractedFields, truth: &GroundTruthRow) -> MatchScoreSet {
        let mut scores = HashMap::new();
        let mut total = 0.0;
        let mut counted = 0usize;

        for (field, field_type) in TRACKED_FIELDS.iter() {
            let extracted_value = extracted.tracked(field);
            let truth_value = truth.field(field);

            let e = normalize(extracted_value);
            let g = normalize(truth_value);
            if e.is_empty() && g.is_empty() {
                continue;
            }

            let score = if e.is_empty() || g.is_empty() {
                0.0
            } else if *field == "State" && !states::is_known_state(extracted_value) {
                // Geographic guard: a State value that resembles no known state
                // scores 0 even when textually identical to the cell.
                0.0
            } else {
                let local = local_score(&e, &g);
                match &self.scorer {
                    Some(scorer) => score_with_retry(
                        scorer.as_ref(),
                        extracted_value,
                        truth_value,
                        *field_type,
                        self.retry,
                        local,
                    ),
                    None => local,
                }
            };

            scores.insert(format!("{} Match Score", field), score);
            total += score;
            counted += 1;
        }

        let overall = if counted > 0 {
            total / counted as f64
        } else {
            0.0
        };
        MatchScoreSet::new(scores, overall)
    }
}
