use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plantcare_core::{Config, IdentifyMode};
use plantcare_services::PlantTracker;
use plantcare_ui::Session;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "plantcare")]
#[command(about = "Track your plants, identify them from photos and get watering reminders")]
struct Cli {
    /// City used for the weather lookup
    #[arg(short, long)]
    location: Option<String>,

    /// Identify through a relay server instead of calling Plant.id directly
    #[arg(long, value_name = "URL")]
    relay: Option<String>,

    /// Directory holding saved reminders
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    plantcare_core::init()?;

    let (mut config, _validation) = Config::load_validated()?;
    if let Some(location) = cli.location {
        config.weather.location = location;
    }
    if let Some(url) = cli.relay {
        config.identify.relay_url = url;
        config.identify.mode = IdentifyMode::Relay;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    tracing::info!(
        config_dir = %config.config_dir.display(),
        mode = ?config.identify.mode,
        location = %config.weather.location,
        "PlantCare starting"
    );

    let tracker = PlantTracker::from_config(&config).context("Failed to open reminder storage")?;
    let mut session = Session::new(tracker);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    session.run(stdin, &mut stdout).await?;

    Ok(())
}
