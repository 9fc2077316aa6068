//! Centralized error types for the PlantCare tracker.
//!
//! This module provides the error kinds every workflow reports through:
//! - Validation failures caught before any network call
//! - Low-confidence identifications, which callers treat differently
//! - Service and network failures from the external APIs
//!
//! Each error renders as a single replaceable message in the UI.

use thiserror::Error;

/// Top-level application error type.
///
/// Crate-level errors (identification, weather, calendar) convert into this
/// type so the tracker can classify failures uniformly.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing input or unsupported image type. Raised before any request.
    #[error("{0}")]
    Validation(String),

    /// The service answered, but the top suggestion is below the
    /// acceptance threshold.
    #[error("Identification too uncertain: match below 10%. Please upload a clearer image.")]
    LowConfidence { probability: f64 },

    /// Non-success HTTP response (or undecodable body) from a service.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl AppError {
    /// True for the one failure that must not produce a fallback plant.
    pub fn is_low_confidence(&self) -> bool {
        matches!(self, AppError::LowConfidence { .. })
    }
}

/// Network-related errors (HTTP transport, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Local key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read storage: {0}")]
    Read(String),

    #[error("Failed to write storage: {0}")]
    Write(String),

    #[error("Stored data is corrupted: {0}")]
    Corrupt(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
