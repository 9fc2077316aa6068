//! Persistence of the reminder list under a fixed storage key.

use std::sync::Arc;

use plantcare_core::StorageError;

use crate::storage::KeyValueStore;

/// Key holding the JSON array of reminder lines.
pub const REMINDERS_KEY: &str = "reminders";

#[derive(Clone)]
pub struct ReminderStore {
    store: Arc<dyn KeyValueStore>,
}

impl ReminderStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the saved reminders. Absent, unreadable or malformed data
    /// yields an empty list.
    pub fn load(&self) -> Vec<String> {
        let raw = match self.store.get(REMINDERS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read saved reminders: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(reminders) => {
                tracing::debug!(count = reminders.len(), "Loaded saved reminders");
                reminders
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed saved reminders: {}", e);
                Vec::new()
            }
        }
    }

    /// Write the full list, replacing what was stored.
    pub fn save(&self, reminders: &[String]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(reminders).map_err(|e| StorageError::Write(e.to_string()))?;
        self.store.set(REMINDERS_KEY, &json)?;
        tracing::debug!(count = reminders.len(), "Saved reminders");
        Ok(())
    }

    /// Delete the key entirely (not an empty array).
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(REMINDERS_KEY)
    }
}
