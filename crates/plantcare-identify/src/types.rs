//! Identification results and Plant.id wire types.

use serde::{Deserialize, Serialize};

use crate::error::IdentifyError;

/// Suggestions below this probability are rejected.
pub const MIN_PROBABILITY: f64 = 0.10;
pub const DEFAULT_WATERING_DAYS: u32 = 7;
pub const DEFAULT_REPOTTING_DAYS: u32 = 365;
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// Details requested from Plant.id alongside each suggestion.
pub const REQUESTED_DETAILS: &[&str] = &["common_names", "care"];

/// Normalized result of a successful identification.
///
/// Also the relay's response body, hence the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub species: String,
    pub watering_interval: u32,
    pub repotting_interval: u32,
}

// Plant.id response types

#[derive(Debug, Deserialize)]
pub struct IdentifyResponse {
    /// Required: a body without it is a malformed response, not a weak match.
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct Suggestion {
    pub probability: Option<f64>,
    pub plant_name: Option<String>,
    pub plant_details: Option<PlantDetails>,
}

#[derive(Debug, Deserialize)]
pub struct PlantDetails {
    pub care: Option<Care>,
}

#[derive(Debug, Deserialize)]
pub struct Care {
    pub watering: Option<CareInterval>,
    pub repotting: Option<CareInterval>,
}

#[derive(Debug, Deserialize)]
pub struct CareInterval {
    pub interval_days: Option<f64>,
}

impl CareInterval {
    fn days(&self) -> Option<u32> {
        self.interval_days
            .filter(|d| d.is_finite() && *d >= 1.0)
            .map(|d| d.round() as u32)
    }
}

impl IdentifyResponse {
    /// Reduce the ranked suggestions to the top one, applying the
    /// confidence threshold and per-field defaults.
    pub fn into_identification(self) -> Result<Identification, IdentifyError> {
        let top = self.suggestions.into_iter().next();

        let probability = top
            .as_ref()
            .and_then(|s| s.probability)
            .unwrap_or(0.0);
        if probability.is_nan() || probability < MIN_PROBABILITY {
            return Err(IdentifyError::LowConfidence { probability });
        }

        // Checked above: a missing suggestion has probability 0.
        let Some(top) = top else {
            return Err(IdentifyError::LowConfidence { probability });
        };

        let care = top.plant_details.and_then(|d| d.care);
        let watering = care
            .as_ref()
            .and_then(|c| c.watering.as_ref())
            .and_then(CareInterval::days);
        let repotting = care
            .as_ref()
            .and_then(|c| c.repotting.as_ref())
            .and_then(CareInterval::days);

        Ok(Identification {
            species: top
                .plant_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_SPECIES.to_string()),
            watering_interval: watering.unwrap_or(DEFAULT_WATERING_DAYS),
            repotting_interval: repotting.unwrap_or(DEFAULT_REPOTTING_DAYS),
        })
    }
}

// Relay wire types

/// Body accepted by the relay's identify endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// Base64-encoded image bytes.
    pub image: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Error body returned by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayErrorBody {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

pub const CODE_INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const CODE_LOW_CONFIDENCE: &str = "LOW_CONFIDENCE";
pub const CODE_UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
