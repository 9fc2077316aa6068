//! Calendar event payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// All-day date in the shape calendar APIs expect (`{"date": "YYYY-MM-DD"}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDate {
    pub date: NaiveDate,
}

/// An all-day calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: EventDate,
    pub end: EventDate,
}

impl CalendarEvent {
    /// Single-day event on `date`.
    pub fn all_day(summary: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            summary: summary.into(),
            start: EventDate { date },
            end: EventDate { date },
        }
    }
}
