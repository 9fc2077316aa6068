//! Weather service for PlantCare
//!
//! Fetches current conditions from OpenWeatherMap for a fixed location and
//! derives the weather-adjusted watering interval shown on the dashboard.

pub mod provider;
pub mod types;

pub use provider::WeatherProvider;
pub use types::*;
