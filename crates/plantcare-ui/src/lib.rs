//! Terminal presentation for PlantCare
//!
//! Renders the dashboard and drives the add/remove/clear interactions
//! from line commands.

pub mod dashboard;
pub mod session;

pub use dashboard::render_dashboard;
pub use session::{Command, Session};
