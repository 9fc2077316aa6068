//! Plant identification for PlantCare.
//!
//! Talks to the Plant.id v2 API, either directly or through the
//! identification relay, and reduces the ranked suggestions to a species
//! plus care intervals.

pub mod client;
pub mod error;
pub mod identifier;
pub mod image;
pub mod relay;
pub mod types;

pub use client::IdentificationClient;
pub use error::IdentifyError;
pub use identifier::Identifier;
pub use image::ImageUpload;
pub use relay::RelayClient;
pub use types::{
    Identification, DEFAULT_REPOTTING_DAYS, DEFAULT_WATERING_DAYS, MIN_PROBABILITY,
};
