//! Calendar sinks: where scheduled watering events are delivered.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::CalendarError;
use crate::types::CalendarEvent;

/// Destination for watering events.
#[async_trait]
pub trait CalendarSink: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Deliver a single event.
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), CalendarError>;
}

/// Sink that logs the payload it would send and transmits nothing.
///
/// Delivered events are kept in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct MockCalendar {
    events: Mutex<Vec<CalendarEvent>>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl CalendarSink for MockCalendar {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_event(&self, event: &CalendarEvent) -> Result<(), CalendarError> {
        if event.summary.trim().is_empty() {
            return Err(CalendarError::InvalidEventData("empty summary".to_string()));
        }

        let payload = serde_json::to_string(event)
            .map_err(|e| CalendarError::InvalidEventData(e.to_string()))?;
        tracing::info!(%payload, "Calendar event (mock, not sent)");

        self.events.lock().push(event.clone());
        Ok(())
    }
}
