use anyhow::Result;
use ramble66::{RambleConfig, logging, web};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RambleConfig::load()?;
    logging::init(&config.logging)?;

    info!(
        version = ramble66::VERSION,
        live_weather = config.weather.has_api_key(),
        "Starting Ramble 66"
    );

    web::run(config).await
}
