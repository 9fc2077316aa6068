//! Identification relay binary.
//!
//! Usage:
//!   PLANT_ID_API_KEY=... plantcare-relay
//!
//! # Environment Variables
//!
//! - `PLANT_ID_API_KEY` - Plant.id API key (required)
//! - `PORT` - Port to listen on (default: 3000)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use plantcare_core::Config;
use plantcare_identify::IdentificationClient;
use plantcare_relay::{routes, RelayState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,plantcare_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Environment only: the relay keeps no files.
    let config = Config::from_env();
    let api_key = config
        .require_identify_key()
        .context("Refusing to start without an identification key")?;

    let addr: SocketAddr = format!("{}:{}", config.relay.bind, config.relay.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.relay.bind))?;

    let client = IdentificationClient::new_with_base_url(api_key, &config.identify.api_url);
    let state = Arc::new(RelayState::new(client));

    tracing::info!("Identification relay listening on http://{}", addr);
    warp::serve(routes(state)).run(addr).await;

    Ok(())
}
