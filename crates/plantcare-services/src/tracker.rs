//! Application state and workflows of the plant tracker.
//!
//! `PlantTracker` is the single state store behind the dashboard. Every
//! mutation goes through its methods, and every change to the reminder
//! list is mirrored to storage before the method returns.

use std::sync::Arc;

use chrono::NaiveDate;
use plantcare_core::{AppError, Config, StorageError};
use plantcare_identify::{Identifier, ImageUpload};
use plantcare_weather::{adjust_watering_interval, WeatherProvider, WeatherSnapshot};

use crate::plant::{DraftPlant, Plant};
use crate::reminder::{reminder_plant_name, ReminderScheduler};
use crate::reminder_store::ReminderStore;
use crate::storage::{FileStore, KeyValueStore};

pub const MISSING_INPUT_MESSAGE: &str = "Please enter a name and an image.";
pub const INVALID_IMAGE_MESSAGE: &str = "Invalid image format. Please upload a JPG or PNG image.";

/// What a submit of the add-plant form produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Identification succeeded.
    Added(Plant),
    /// Identification failed; a placeholder plant was recorded instead.
    Fallback(Plant),
    /// Nothing was recorded (missing input or low confidence).
    NotAdded,
}

pub struct PlantTracker {
    plants: Vec<Plant>,
    draft: DraftPlant,
    weather: Option<WeatherSnapshot>,
    reminders: Vec<String>,
    error: Option<String>,

    identifier: Identifier,
    weather_provider: WeatherProvider,
    scheduler: ReminderScheduler,
    store: ReminderStore,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl PlantTracker {
    /// Create a tracker, restoring reminders saved by earlier sessions.
    pub fn new(
        identifier: Identifier,
        weather_provider: WeatherProvider,
        scheduler: ReminderScheduler,
        store: ReminderStore,
    ) -> Self {
        let reminders = store.load();
        Self {
            plants: Vec::new(),
            draft: DraftPlant::default(),
            weather: None,
            reminders,
            error: None,
            identifier,
            weather_provider,
            scheduler,
            store,
            clock: local_today,
        }
    }

    /// Wire a tracker from configuration: file-backed storage in the data
    /// directory and the mock calendar.
    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let backing: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage.data_dir)?);
        Ok(Self::new(
            Identifier::from_config(&config.identify),
            WeatherProvider::from_config(&config.weather),
            ReminderScheduler::mock(),
            ReminderStore::new(backing),
        ))
    }

    /// Replace the source of "today" (used for `last_watered`).
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn reminders(&self) -> &[String] {
        &self.reminders
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &DraftPlant {
        &self.draft
    }

    /// Watering interval of `plant` as shown, adjusted for current weather.
    pub fn display_interval(&self, plant: &Plant) -> u32 {
        adjust_watering_interval(plant.watering_interval, self.weather.as_ref())
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Put an image into the draft. Non-JPEG/PNG images are refused, the
    /// draft image is cleared and the error is shown.
    pub fn select_image(&mut self, image: ImageUpload) -> bool {
        if image.validate().is_err() {
            tracing::warn!(content_type = %image.content_type, "Rejected image format");
            self.error = Some(INVALID_IMAGE_MESSAGE.to_string());
            self.draft.image = None;
            return false;
        }

        tracing::debug!(file = %image.file_name, "Image selected");
        self.draft.image = Some(image);
        true
    }

    /// Fetch the weather once. On failure the error is shown and the
    /// fallback snapshot is used.
    pub async fn load_weather(&mut self) {
        match self.weather_provider.fetch_current().await {
            Ok(snapshot) => self.weather = Some(snapshot),
            Err(e) => {
                let err = AppError::from(e);
                tracing::error!("Weather fetch failed: {}", err);
                self.error = Some(format!("Error fetching weather data: {}", err));
                self.weather = Some(WeatherSnapshot::fallback());
                tracing::info!("Using fallback weather");
            }
        }
    }

    /// Submit the add-plant form.
    ///
    /// Low-confidence identifications record nothing; every other failure
    /// records a fallback plant so the entry is not lost.
    pub async fn add_plant(&mut self) -> AddOutcome {
        let image = match &self.draft.image {
            Some(image) if self.draft.is_complete() => image.clone(),
            _ => {
                tracing::warn!(
                    has_name = !self.draft.name.trim().is_empty(),
                    has_image = self.draft.image.is_some(),
                    "Missing input for new plant"
                );
                self.error = Some(MISSING_INPUT_MESSAGE.to_string());
                return AddOutcome::NotAdded;
            }
        };
        let name = self.draft.name.clone();

        tracing::info!(plant = %name, file = %image.file_name, "Identifying plant");
        let result = self.identifier.identify(&image).await.map_err(AppError::from);

        match result {
            Ok(identification) => {
                let plant =
                    Plant::identified(self.next_id(), name, (self.clock)(), identification);
                self.plants.push(plant.clone());
                self.draft.clear();
                self.error = None;
                tracing::info!(id = plant.id, species = %plant.species, "Plant added");

                self.schedule_reminder(&plant).await;
                AddOutcome::Added(plant)
            }
            Err(err) => {
                tracing::error!("Adding plant failed: {}", err);
                self.error = Some(format!("Error adding plant: {}", err));

                if err.is_low_confidence() {
                    return AddOutcome::NotAdded;
                }

                let plant = Plant::fallback(self.next_id(), name, (self.clock)());
                self.plants.push(plant.clone());
                self.draft.clear();
                tracing::info!(id = plant.id, "Fallback plant added");
                AddOutcome::Fallback(plant)
            }
        }
    }

    /// Delete the reminder at `index` together with every plant named in it.
    ///
    /// Returns false (and changes nothing) for an out-of-range index.
    pub fn remove_reminder(&mut self, index: usize) -> bool {
        let Some(reminder) = self.reminders.get(index) else {
            tracing::warn!(index, count = self.reminders.len(), "No reminder at index");
            return false;
        };

        let plant_name = reminder_plant_name(reminder).map(str::to_owned);
        if let Some(name) = &plant_name {
            self.plants.retain(|p| &p.name != name);
        }

        let mut reminders = self.reminders.clone();
        reminders.remove(index);
        self.set_reminders(reminders);

        tracing::info!(index, plant = ?plant_name, "Reminder and plant removed");
        true
    }

    /// Empty the reminder list and delete it from storage.
    pub fn clear_reminders(&mut self) {
        self.reminders.clear();
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear saved reminders: {}", e);
            self.error = Some(format!("Error clearing reminders: {}", e));
            return;
        }
        tracing::info!("All reminders cleared");
    }

    fn next_id(&self) -> u32 {
        u32::try_from(self.plants.len()).unwrap_or(u32::MAX - 1) + 1
    }

    async fn schedule_reminder(&mut self, plant: &Plant) {
        match self.scheduler.schedule(plant).await {
            Ok(reminder) => {
                let mut reminders = self.reminders.clone();
                reminders.push(reminder);
                self.set_reminders(reminders);
            }
            Err(e) => {
                tracing::error!("Scheduling reminder failed: {}", e);
                self.error = Some(e.user_message());
            }
        }
    }

    /// Replace the reminder list and mirror it to storage.
    fn set_reminders(&mut self, reminders: Vec<String>) {
        self.reminders = reminders;
        if let Err(e) = self.store.save(&self.reminders) {
            tracing::error!("Failed to save reminders: {}", e);
            self.error = Some(format!("Error saving reminders: {}", e));
        }
    }
}
