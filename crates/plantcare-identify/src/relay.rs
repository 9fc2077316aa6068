//! Client for the identification relay.
//!
//! The relay holds the Plant.id key server-side; this client only ships the
//! image and maps the relay's error codes back onto [`IdentifyError`].

use base64::Engine;
use tracing::instrument;

use crate::error::IdentifyError;
use crate::image::ImageUpload;
use crate::types::{Identification, RelayErrorBody, RelayRequest, CODE_LOW_CONFIDENCE};

pub const IDENTIFY_PATH: &str = "/api/identify-plant";

pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self, image), fields(file = %image.file_name), level = "info")]
    pub async fn identify(&self, image: &ImageUpload) -> Result<Identification, IdentifyError> {
        image.validate()?;

        let url = format!("{}{}", self.base_url, IDENTIFY_PATH);
        let body = RelayRequest {
            image: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            file_name: Some(image.file_name.clone()),
            content_type: Some(image.content_type.clone()),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| IdentifyError::Service {
                    status: status.as_u16(),
                    message: format!("JSON parse error: {}", e),
                });
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<RelayErrorBody>(&text) {
            Ok(err) if err.code == CODE_LOW_CONFIDENCE => Err(IdentifyError::LowConfidence {
                probability: err.probability.unwrap_or(0.0),
            }),
            Ok(err) => Err(IdentifyError::Service {
                status: status.as_u16(),
                // The relay already renders the upstream prefix.
                message: err
                    .error
                    .trim_start_matches("Plant.id API error: ")
                    .to_string(),
            }),
            Err(_) => Err(IdentifyError::Service {
                status: status.as_u16(),
                message: format!(
                    "{} - {}",
                    status.canonical_reason().unwrap_or(status.as_str()),
                    if text.trim().is_empty() { "no details" } else { text.as_str() }
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn jpeg() -> ImageUpload {
        ImageUpload::new("monstera.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
    }

    #[tokio::test]
    async fn test_relay_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(IDENTIFY_PATH))
            .and(body_partial_json(serde_json::json!({
                "image": "/9j/4A==",
                "fileName": "monstera.jpg",
                "contentType": "image/jpeg"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "species": "Monstera deliciosa",
                "wateringInterval": 9,
                "repottingInterval": 730
            })))
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let result = client.identify(&jpeg()).await.unwrap();

        assert_eq!(result.species, "Monstera deliciosa");
        assert_eq!(result.watering_interval, 9);
        assert_eq!(result.repotting_interval, 730);
    }

    #[tokio::test]
    async fn test_relay_low_confidence_code() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "error": "too uncertain",
                "code": "LOW_CONFIDENCE",
                "probability": 0.03
            })))
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let result = client.identify(&jpeg()).await;

        assert!(matches!(
            result,
            Err(IdentifyError::LowConfidence { probability }) if probability == 0.03
        ));
    }

    #[tokio::test]
    async fn test_relay_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "error": "Plant.id API error: Forbidden - no details",
                "code": "UPSTREAM_ERROR"
            })))
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let result = client.identify(&jpeg()).await;

        assert!(matches!(result, Err(IdentifyError::Service { status: 502, .. })));
    }
}
