use std::time::Duration;

use crate::models::NotificationEntry;
use crate::utils::VerifyError;

/// Downstream sink receiving the flattened verification results. Failures here
/// are logged by the caller and never affect the primary response.
pub trait NotificationSink {
    fn send(&self, entries: &[NotificationEntry]) -> Result<(), VerifyError>;
}

pub struct HttpNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(url: &str) -> Result<Self, VerifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VerifyError::Notification(e.to_string()))?;
        Ok(HttpNotifier {
            client,
            url: url.to_string(),
        })
    }
}

impl NotificationSink for HttpNotifier {
    fn send(&self, entries: &[NotificationEntry]) -> Result<(), VerifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(entries)
            .send()
            .map_err(|e| VerifyError::Notification(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Notification(format!(
                "sink returned {}",
                status
            )));
        }
        Ok(())
    }
}
