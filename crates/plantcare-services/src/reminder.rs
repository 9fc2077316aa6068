//! Watering reminders and the (mock) reminder scheduler.

use std::sync::Arc;

use chrono::NaiveDate;
use plantcare_calendar::{CalendarError, CalendarEvent, CalendarSink, MockCalendar};

use crate::plant::Plant;

const REMINDER_PREFIX: &str = "Water ";
const DATE_SEPARATOR: &str = " on ";

/// Render a reminder line, e.g. `Water Fern on 10/23/2026`.
pub fn format_reminder(name: &str, date: NaiveDate) -> String {
    format!(
        "{}{}{}{}",
        REMINDER_PREFIX,
        name,
        DATE_SEPARATOR,
        date.format("%-m/%-d/%Y")
    )
}

/// Recover the plant name embedded in a reminder line.
///
/// Reads everything between `Water ` and the last ` on `, so names with
/// spaces survive. Lines in any other shape fall back to the second
/// whitespace-separated token.
pub fn reminder_plant_name(reminder: &str) -> Option<&str> {
    if let Some(rest) = reminder.strip_prefix(REMINDER_PREFIX) {
        if let Some((name, _date)) = rest.rsplit_once(DATE_SEPARATOR) {
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    reminder.split_whitespace().nth(1)
}

/// Computes the next watering date and hands the event to a calendar sink.
#[derive(Clone)]
pub struct ReminderScheduler {
    calendar: Arc<dyn CalendarSink>,
}

impl ReminderScheduler {
    pub fn new(calendar: Arc<dyn CalendarSink>) -> Self {
        Self { calendar }
    }

    /// Scheduler backed by the logging-only calendar.
    pub fn mock() -> Self {
        Self::new(Arc::new(MockCalendar::new()))
    }

    /// Schedule the next watering of `plant`, returning its reminder line.
    pub async fn schedule(&self, plant: &Plant) -> Result<String, CalendarError> {
        let next = plant.next_watering();
        let event = CalendarEvent::all_day(format!("{}{}", REMINDER_PREFIX, plant.name), next);

        tracing::debug!(calendar = self.calendar.name(), plant = %plant.name, %next, "Scheduling watering");
        self.calendar.create_event(&event).await?;

        Ok(format_reminder(&plant.name, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_reminder() {
        assert_eq!(
            format_reminder("Fern", date(2026, 10, 23)),
            "Water Fern on 10/23/2026"
        );
        assert_eq!(
            format_reminder("Basil", date(2027, 1, 4)),
            "Water Basil on 1/4/2027"
        );
    }

    #[test]
    fn test_parse_single_word_name() {
        assert_eq!(reminder_plant_name("Water Fern on 10/23/2026"), Some("Fern"));
    }

    #[test]
    fn test_parse_name_with_spaces() {
        assert_eq!(
            reminder_plant_name("Water Money Tree on 1/4/2027"),
            Some("Money Tree")
        );
        assert_eq!(
            reminder_plant_name("Water Lily on the Pond on 1/4/2027"),
            Some("Lily on the Pond")
        );
    }

    #[test]
    fn test_parse_foreign_shape_uses_second_token() {
        assert_eq!(reminder_plant_name("Gieße Kaktus am 4.1.2027"), Some("Kaktus"));
        assert_eq!(reminder_plant_name("lonely"), None);
    }

    #[tokio::test]
    async fn test_schedule_sends_event_and_returns_line() {
        let calendar = Arc::new(MockCalendar::new());
        let scheduler = ReminderScheduler::new(calendar.clone());

        let mut plant = Plant::fallback(1, "Fern", date(2026, 10, 18));
        plant.watering_interval = 5;

        let line = scheduler.schedule(&plant).await.unwrap();
        assert_eq!(line, "Water Fern on 10/23/2026");

        let events = calendar.events();
        assert_eq!(events, vec![CalendarEvent::all_day("Water Fern", date(2026, 10, 23))]);
    }
}
