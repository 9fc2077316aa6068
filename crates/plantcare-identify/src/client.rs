//! Plant.id API client.

use reqwest::multipart::{Form, Part};
use tracing::instrument;

use crate::error::IdentifyError;
use crate::image::ImageUpload;
use crate::types::{Identification, IdentifyResponse, REQUESTED_DETAILS};

const PLANT_ID_API_BASE: &str = "https://api.plant.id";

pub struct IdentificationClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl IdentificationClient {
    pub fn new(api_key: &str) -> Self {
        Self::new_with_base_url(api_key, PLANT_ID_API_BASE)
    }

    pub fn new_with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Identify the plant in `image`.
    ///
    /// Unsupported image types are rejected before any request is sent.
    #[instrument(skip(self, image), fields(file = %image.file_name), level = "info")]
    pub async fn identify(&self, image: &ImageUpload) -> Result<Identification, IdentifyError> {
        image.validate()?;

        let url = format!("{}/v2/identify", self.base_url);

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|_| IdentifyError::UnsupportedFormat(image.content_type.clone()))?;

        let mut form = Form::new()
            .part("images", part)
            .text("api_key", self.api_key.clone());
        for detail in REQUESTED_DETAILS {
            form = form.text("plant_details", *detail);
        }

        tracing::debug!(
            content_type = %image.content_type,
            size = image.bytes.len(),
            api_key = %mask_key(&self.api_key),
            "Sending identification request"
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            let details = if text.trim().is_empty() {
                "no details".to_string()
            } else {
                text
            };
            tracing::warn!(status = status.as_u16(), "Plant.id request failed");
            return Err(IdentifyError::Service {
                status: status.as_u16(),
                message: format!("{} - {}", reason, details),
            });
        }

        let body: IdentifyResponse = response.json().await.map_err(|e| IdentifyError::Service {
            status: status.as_u16(),
            message: format!("JSON parse error: {}", e),
        })?;

        let identification = body.into_identification()?;
        tracing::info!(species = %identification.species, "Plant identified");
        Ok(identification)
    }
}

/// First five characters of a key, for logs.
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(5).collect();
    format!("{}...", prefix)
}
