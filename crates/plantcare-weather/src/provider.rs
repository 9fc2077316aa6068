use crate::types::{CurrentWeatherResponse, WeatherError, WeatherSnapshot};
use plantcare_core::WeatherConfig;
use reqwest::Client;
use std::sync::Arc;
use tracing::instrument;

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    location: String,
}

impl WeatherProvider {
    pub fn new(api_key: &str, location: &str) -> Self {
        Self::new_with_base_url(api_key, location, OPENWEATHER_API_BASE)
    }

    pub fn new_with_base_url(api_key: &str, location: &str, base_url: &str) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            location: location.to_string(),
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Self {
        let key = config.api_key.as_deref().unwrap_or_default();
        Self::new_with_base_url(key, &config.location, &config.api_url)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetch current conditions for the configured location.
    #[instrument(skip(self), fields(location = %self.location), level = "info")]
    pub async fn fetch_current(&self) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", self.location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: CurrentWeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let snapshot = body.into_snapshot()?;
        tracing::info!(condition = %snapshot.condition, temp = snapshot.temp, "Weather loaded");
        Ok(snapshot)
    }
}
