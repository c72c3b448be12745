use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::models::ExtractedFields;
use crate::processing::address::parse_address;
use crate::utils::VerifyError;

/// Classification and fields read off one image.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub classification: String,
    pub fields: ExtractedFields,
}

impl Extraction {
    /// Result for an image nothing could be read from.
    pub fn empty() -> Self {
        Extraction {
            classification: "Unknown".to_string(),
            fields: ExtractedFields::default(),
        }
    }
}

/// Document extraction capability wrapping the classification, detection/OCR
/// and address-parsing backends. Implementations must never fail for a single
/// bad image: internal errors degrade to empty field values so the batch keeps
/// going.
pub trait FieldExtractor {
    fn extract(&self, image: &Path) -> Extraction;
}

#[derive(Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    classification: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    uid: String,
    #[serde(default)]
    address: String,
}

/// Inference-service client: posts the image bytes and maps the returned
/// `{classification, name, uid, address}` into the tracked field set, running
/// the address parser over the raw address.
pub struct HttpExtractor {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpExtractor {
    pub fn new(url: &str) -> Result<Self, VerifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| VerifyError::Extraction(e.to_string()))?;
        Ok(HttpExtractor {
            client,
            url: url.to_string(),
        })
    }

    fn try_extract(&self, image: &Path) -> Result<Extraction, VerifyError> {
        let bytes = std::fs::read(image)?;
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .map_err(|e| VerifyError::Extraction(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Extraction(format!(
                "inference service returned {}",
                status
            )));
        }
        let body: ExtractionResponse = response
            .json()
            .map_err(|e| VerifyError::Extraction(format!("invalid response: {}", e)))?;

        Ok(build_extraction(
            &body.classification,
            &body.name,
            &body.uid,
            &body.address,
        ))
    }
}

impl FieldExtractor for HttpExtractor {
    fn extract(&self, image: &Path) -> Extraction {
        match self.try_extract(image) {
            Ok(extraction) => extraction,
            Err(err) => {
                warn!("Extraction failed for {}: {}", image.display(), err);
                Extraction::empty()
            }
        }
    }
}

/// Assemble an [`Extraction`] from the raw backend outputs, decomposing the
/// address string into its sub-fields.
pub fn build_extraction(classification: &str, name: &str, uid: &str, address: &str) -> Extraction {
    let parts = parse_address(address);
    let classification = if classification.trim().is_empty() {
        "Unknown".to_string()
    } else {
        classification.trim().to_string()
    };
    Extraction {
        classification,
        fields: ExtractedFields {
            name: name.trim().to_string(),
            uid: uid.trim().to_string(),
            address: address.trim().to_string(),
            house_flat_number: parts.house_flat_number,
            town: parts.town,
            street_road_name: parts.street_road_name,
            city: parts.city,
            country: parts.country,
            pincode: parts.pincode,
            premise_building_name: parts.premise_building_name,
            landmark: parts.landmark,
            state: parts.state,
        },
    }
}
