//! Calendar integration for PlantCare.
//!
//! Watering events go through a [`CalendarSink`]. The shipped sink is a
//! mock that only logs the payload; a real calendar client can implement
//! the same trait without touching the scheduler.

pub mod error;
pub mod sink;
pub mod types;

pub use error::CalendarError;
pub use sink::{CalendarSink, MockCalendar};
pub use types::{CalendarEvent, EventDate};
