use plantcare_core::{AppError, NetworkError, ReqwestErrorExt};
use serde::{Deserialize, Serialize};

/// Above this temperature (°C) plants are watered a day earlier.
pub const HOT_THRESHOLD_CELSIUS: f64 = 25.0;

/// Condition label that pushes watering back by a day.
pub const RAIN_CONDITION: &str = "Rain";

/// Condition shown when the weather service cannot be reached.
pub const FALLBACK_CONDITION: &str = "Sunny";
pub const FALLBACK_TEMP_CELSIUS: f64 = 20.0;

/// Simplified current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Main condition label, e.g. "Clear", "Rain", "Clouds".
    pub condition: String,
    /// Temperature in Celsius.
    pub temp: f64,
}

impl WeatherSnapshot {
    pub fn new(condition: impl Into<String>, temp: f64) -> Self {
        Self {
            condition: condition.into(),
            temp,
        }
    }

    /// Snapshot substituted when fetching fails, so the UI never waits forever.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CONDITION, FALLBACK_TEMP_CELSIUS)
    }

    pub fn is_sunny(&self) -> bool {
        self.condition == FALLBACK_CONDITION
    }

    pub fn is_rain(&self) -> bool {
        self.condition == RAIN_CONDITION
    }
}

/// Adjust a watering interval for display.
///
/// Hot weather shortens the interval by a day; otherwise rain lengthens it
/// by a day. The stored interval is never changed.
pub fn adjust_watering_interval(interval: u32, weather: Option<&WeatherSnapshot>) -> u32 {
    let Some(weather) = weather else {
        return interval;
    };

    if weather.temp > HOT_THRESHOLD_CELSIUS {
        interval.saturating_sub(1)
    } else if weather.is_rain() {
        interval.saturating_add(1)
    } else {
        interval
    }
}

// OpenWeatherMap response types

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub weather: Vec<WeatherEntry>,
    pub main: MainBlock,
}

#[derive(Debug, Deserialize)]
pub struct WeatherEntry {
    pub main: String,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
}

impl CurrentWeatherResponse {
    pub fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| WeatherError::Parse("response has no weather entries".to_string()))?;

        Ok(WeatherSnapshot::new(condition, self.main.temp))
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Weather API error: {status} {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Network(e.into_network_error())
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(inner) => AppError::Network(inner),
            WeatherError::Api { status, .. } => AppError::Service {
                status,
                message: e.to_string(),
            },
            WeatherError::Parse(msg) => {
                AppError::Network(NetworkError::InvalidResponse(msg))
            }
        }
    }
}
