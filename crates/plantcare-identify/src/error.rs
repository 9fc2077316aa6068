//! Identification-specific error types.

use plantcare_core::{AppError, NetworkError, ReqwestErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error("Invalid image format. Please upload a JPG or PNG image.")]
    UnsupportedFormat(String),

    #[error("Identification too uncertain: match below 10%. Please upload a clearer image.")]
    LowConfidence { probability: f64 },

    #[error("Plant.id API error: {message}")]
    Service { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl From<reqwest::Error> for IdentifyError {
    fn from(e: reqwest::Error) -> Self {
        IdentifyError::Network(e.into_network_error())
    }
}

impl From<IdentifyError> for AppError {
    fn from(e: IdentifyError) -> Self {
        match e {
            IdentifyError::UnsupportedFormat(_) => AppError::Validation(e.to_string()),
            IdentifyError::LowConfidence { probability } => AppError::LowConfidence { probability },
            IdentifyError::Service { status, .. } => AppError::Service {
                status,
                message: e.to_string(),
            },
            IdentifyError::Network(inner) => AppError::Network(inner),
        }
    }
}
