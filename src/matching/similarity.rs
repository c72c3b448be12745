use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{FieldType, RetryPolicy};
use crate::utils::VerifyError;

/// Remote similarity capability. The matcher treats it as advisory: failures
/// are retried and then replaced by the local fuzzy score.
pub trait SimilarityScorer {
    fn score(
        &self,
        extracted: &str,
        expected: &str,
        field_type: FieldType,
    ) -> Result<f64, VerifyError>;
}

/// Retry the scorer per policy, falling back to `local_score` on exhaustion.
pub fn score_with_retry(
    scorer: &dyn SimilarityScorer,
    extracted: &str,
    expected: &str,
    field_type: FieldType,
    retry: RetryPolicy,
    local_score: f64,
) -> f64 {
    for attempt in 1..=retry.attempts {
        match scorer.score(extracted, expected, field_type) {
            Ok(score) => return score.clamp(0.0, 100.0),
            Err(err) => {
                warn!(
                    "Similarity call failed (attempt {}/{}) for {} field: {}",
                    attempt,
                    retry.attempts,
                    field_type.as_str(),
                    err
                );
                if attempt < retry.attempts {
                    std::thread::sleep(retry.delay);
                }
            }
        }
    }
    warn!(
        "Similarity retries exhausted for {} field, using local score {:.2}",
        field_type.as_str(),
        local_score
    );
    local_score
}

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    extracted: &'a str,
    expected: &'a str,
    field_type: &'a str,
}

#[derive(Deserialize)]
struct SimilarityResponse {
    score: f64,
}

/// Hosted similarity service client.
pub struct HttpSimilarityScorer {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl HttpSimilarityScorer {
    pub fn new(url: &str, api_key: &str) -> Result<Self, VerifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| VerifyError::Similarity(e.to_string()))?;
        Ok(HttpSimilarityScorer {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl SimilarityScorer for HttpSimilarityScorer {
    fn score(
        &self,
        extracted: &str,
        expected: &str,
        field_type: FieldType,
    ) -> Result<f64, VerifyError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .json(&SimilarityRequest {
                extracted,
                expected,
                field_type: field_type.as_str(),
            })
            .send()
            .map_err(|e| VerifyError::Similarity(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Similarity(format!(
                "service returned {}",
                status
            )));
        }
        let body: SimilarityResponse = response
            .json()
            .map_err(|e| VerifyError::Similarity(format!("invalid response: {}", e)))?;
        Ok(body.score)
    }
}
