use std::time::Duration;

use crate::utils::VerifyError;

/// Thresholds and labels driving the verification decision. Kept in one place
/// so the threshold and the override label are never duplicated inline.
#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    pub verify_threshold: f64,
    pub non_target_label: String,
    pub non_target_remark: String,
    pub matched_remark: String,
    pub low_score_remark: String,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        DecisionPolicy {
            verify_threshold: 85.0,
            non_target_label: "Non-Aadhaar".to_string(),
            non_target_remark: "Non Aadhaar".to_string(),
            matched_remark: "Matched".to_string(),
            low_score_remark: "Low match score".to_string(),
        }
    }
}

/// Retry schedule for the remote similarity service.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Runtime configuration resolved from the environment (a `.env` file is
/// honored via dotenvy). Missing required values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub extractor_url: String,
    pub similarity_url: Option<String>,
    pub similarity_api_key: Option<String>,
    pub notify_url: Option<String>,
    pub decision: DecisionPolicy,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, VerifyError> {
        let _ = dotenvy::dotenv();

        let extractor_url = std::env::var("EXTRACTOR_API_URL")
            .map_err(|_| VerifyError::Config("EXTRACTOR_API_URL is required".to_string()))?;

        let similarity_url = std::env::var("SIMILARITY_API_URL").ok();
        let similarity_api_key = std::env::var("SIMILARITY_API_KEY").ok();
        if similarity_url.is_some() && similarity_api_key.is_none() {
            return Err(VerifyError::Config(
                "SIMILARITY_API_KEY is required when SIMILARITY_API_URL is set".to_string(),
            ));
        }

        let notify_url = std::env::var("NOTIFY_URL").ok();

        let mut decision = DecisionPolicy::default();
        if let Ok(raw) = std::env::var("VERIFY_THRESHOLD") {
            let threshold: f64 = raw.parse().map_err(|_| {
                VerifyError::Config(format!("VERIFY_THRESHOLD is not a number: {}", raw))
            })?;
            if !(0.0..=100.0).contains(&threshold) {
                return Err(VerifyError::Config(format!(
                    "VERIFY_THRESHOLD out of range [0,100]: {}",
                    threshold
                )));
            }
            decision.verify_threshold = threshold;
        }

        Ok(Config {
            extractor_url,
            similarity_url,
            similarity_api_key,
            notify_url,
            decision,
            retry: RetryPolicy::default(),
        })
    }
}
