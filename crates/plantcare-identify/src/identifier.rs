//! Unified identifier over the direct and relayed paths.

use std::sync::Arc;

use plantcare_core::{IdentifyConfig, IdentifyMode};

use crate::client::IdentificationClient;
use crate::error::IdentifyError;
use crate::image::ImageUpload;
use crate::relay::RelayClient;
use crate::types::Identification;

/// Identification backend selected by configuration.
#[derive(Clone)]
pub enum Identifier {
    /// Call Plant.id directly.
    Direct(Arc<IdentificationClient>),

    /// Call the relay, which holds the API key.
    Relay(Arc<RelayClient>),
}

impl Identifier {
    pub fn direct(client: IdentificationClient) -> Self {
        Self::Direct(Arc::new(client))
    }

    pub fn relay(client: RelayClient) -> Self {
        Self::Relay(Arc::new(client))
    }

    /// Build the backend named by `config.mode`.
    ///
    /// A missing key in direct mode is not fatal: the service rejects the
    /// request and the tracker falls back to a placeholder plant.
    pub fn from_config(config: &IdentifyConfig) -> Self {
        match config.mode {
            IdentifyMode::Direct => {
                let key = config.api_key.as_deref().unwrap_or_else(|| {
                    tracing::warn!("No Plant.id API key configured; identification will fail");
                    ""
                });
                Self::direct(IdentificationClient::new_with_base_url(key, &config.api_url))
            }
            IdentifyMode::Relay => Self::relay(RelayClient::new(&config.relay_url)),
        }
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, Self::Relay(_))
    }

    pub async fn identify(&self, image: &ImageUpload) -> Result<Identification, IdentifyError> {
        match self {
            Self::Direct(client) => client.identify(image).await,
            Self::Relay(client) => client.identify(image).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = IdentifyConfig::default();
        assert!(!Identifier::from_config(&config).is_relay());

        config.mode = IdentifyMode::Relay;
        assert!(Identifier::from_config(&config).is_relay());
    }
}
