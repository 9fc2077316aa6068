//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEventData(msg) => format!("Invalid event: {}", msg),
        }
    }
}
