//! Plain-text rendering of the tracker state.

use plantcare_services::PlantTracker;

pub const TITLE: &str = "Virtual Plant Care Tracker";

/// Render the whole dashboard: error banner, weather, plants and reminders.
pub fn render_dashboard(tracker: &PlantTracker) -> String {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len())];

    if let Some(error) = tracker.error() {
        lines.push(format!("! {}", error));
    }

    lines.push(String::new());
    match tracker.weather() {
        Some(weather) => {
            lines.push(format!("Weather: {}, {}°C", weather.condition, weather.temp));
            lines.push(
                if weather.is_sunny() {
                    "Perfect for your plants!"
                } else {
                    "Keep an eye on watering."
                }
                .to_string(),
            );
        }
        None => lines.push("Loading weather data...".to_string()),
    }

    lines.push(String::new());
    if tracker.plants().is_empty() {
        lines.push("No plants added.".to_string());
    }
    for plant in tracker.plants() {
        lines.push(format!("{} ({})", plant.name, plant.species));
        lines.push(format!("  Last watered: {}", plant.last_watered));
        lines.push(format!(
            "  Next watering: in {} days",
            tracker.display_interval(plant)
        ));
        lines.push(format!("  Repotting: every {} days", plant.repotting_interval));
    }

    if !tracker.reminders().is_empty() {
        lines.push(String::new());
        lines.push("Reminders".to_string());
        for (i, reminder) in tracker.reminders().iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, reminder));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plantcare_identify::{IdentificationClient, Identifier, ImageUpload};
    use plantcare_services::{MemoryStore, ReminderScheduler, ReminderStore};
    use plantcare_weather::WeatherProvider;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn tracker(uri: &str) -> PlantTracker {
        PlantTracker::new(
            Identifier::direct(IdentificationClient::new_with_base_url("k", uri)),
            WeatherProvider::new_with_base_url("k", "Berlin", uri),
            ReminderScheduler::mock(),
            ReminderStore::new(Arc::new(MemoryStore::new())),
        )
        .with_clock(today)
    }

    #[test]
    fn test_empty_dashboard() {
        let out = render_dashboard(&tracker("http://127.0.0.1:9"));

        assert!(out.starts_with(TITLE));
        assert!(out.contains("Loading weather data..."));
        assert!(out.contains("No plants added."));
        assert!(!out.contains("Reminders"));
    }

    #[test]
    fn test_empty_dashboard_layout() {
        let out = render_dashboard(&tracker("http://127.0.0.1:9"));

        let expected = format!(
            "{}\n{}\n\nLoading weather data...\n\nNo plants added.\n",
            TITLE,
            "=".repeat(TITLE.len())
        );
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn test_dashboard_shows_adjusted_interval_and_reminders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{ "main": "Rain" }],
                "main": { "temp": 14.5 }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/identify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "suggestions": [{
                    "probability": 0.5,
                    "plant_name": "Fern sp.",
                    "plant_details": { "care": { "watering": { "interval_days": 5 } } }
                }]
            })))
            .mount(&server)
            .await;

        let mut tracker = tracker(&server.uri());
        tracker.load_weather().await;
        tracker.set_draft_name("Fern");
        tracker.select_image(ImageUpload::new("f.png", "image/png", vec![1]));
        tracker.add_plant().await;

        let out = render_dashboard(&tracker);

        assert!(out.contains("Weather: Rain, 14.5°C"));
        assert!(out.contains("Keep an eye on watering."));
        assert!(out.contains("Fern (Fern sp.)"));
        assert!(out.contains("Last watered: 2026-10-18"));
        assert!(out.contains("Next watering: in 6 days"));
        assert!(out.contains("Repotting: every 365 days"));
        assert!(out.contains("1. Water Fern on 10/23/2026"));
    }

    #[tokio::test]
    async fn test_fallback_weather_and_error_banner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut tracker = tracker(&server.uri());
        tracker.load_weather().await;

        let out = render_dashboard(&tracker);

        assert!(out.contains("! Error fetching weather data:"));
        assert!(out.contains("Weather: Sunny, 20°C"));
        assert!(out.contains("Perfect for your plants!"));
    }
}
