//! Plant records and the add-plant draft.

use chrono::{Days, NaiveDate};
use plantcare_identify::{
    Identification, ImageUpload, DEFAULT_REPOTTING_DAYS, DEFAULT_WATERING_DAYS,
};
use serde::{Deserialize, Serialize};

/// Species recorded when identification failed for any reason other than
/// low confidence.
pub const FALLBACK_SPECIES: &str = "Unknown (API failed)";

/// A registered plant. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Sequential id: list length + 1 at creation time.
    pub id: u32,
    pub name: String,
    pub species: String,
    pub last_watered: NaiveDate,
    /// Days between waterings.
    pub watering_interval: u32,
    /// Days between repottings.
    pub repotting_interval: u32,
}

impl Plant {
    /// Build a plant from a successful identification.
    pub fn identified(
        id: u32,
        name: impl Into<String>,
        last_watered: NaiveDate,
        identification: Identification,
    ) -> Self {
        let species = if identification.species.trim().is_empty() {
            FALLBACK_SPECIES.to_string()
        } else {
            identification.species
        };
        Self {
            id,
            name: name.into(),
            species,
            last_watered,
            watering_interval: non_zero_or(identification.watering_interval, DEFAULT_WATERING_DAYS),
            repotting_interval: non_zero_or(
                identification.repotting_interval,
                DEFAULT_REPOTTING_DAYS,
            ),
        }
    }

    /// Placeholder used when identification failed.
    pub fn fallback(id: u32, name: impl Into<String>, last_watered: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            species: FALLBACK_SPECIES.to_string(),
            last_watered,
            watering_interval: DEFAULT_WATERING_DAYS,
            repotting_interval: DEFAULT_REPOTTING_DAYS,
        }
    }

    /// Date of the next watering, by plain calendar arithmetic.
    pub fn next_watering(&self) -> NaiveDate {
        self.last_watered
            .checked_add_days(Days::new(u64::from(self.watering_interval)))
            .unwrap_or(NaiveDate::MAX)
    }
}

fn non_zero_or(value: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value
    }
}

/// The in-progress add-plant form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPlant {
    pub name: String,
    pub image: Option<ImageUpload>,
}

impl DraftPlant {
    /// Both a name and an image are present.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.image.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
