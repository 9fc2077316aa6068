pub mod plant;
pub mod reminder;
pub mod reminder_store;
pub mod storage;
pub mod tracker;

pub use plant::{DraftPlant, Plant, FALLBACK_SPECIES};
pub use reminder::{format_reminder, reminder_plant_name, ReminderScheduler};
pub use reminder_store::{ReminderStore, REMINDERS_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::{AddOutcome, PlantTracker};
