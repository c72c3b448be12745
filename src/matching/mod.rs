pub mod field_matcher;
pub mod similarity;
pub mod states;

pub use field_matcher::FieldMatcher;
pub use similarity::{HttpSimilarityScorer, SimilarityScorer};
