mod app;
mod config;
mod effects;
mod transport;

use anyhow::Context as _;
use bot_logging::bot_info;

use crate::config::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env().context("invalid configuration")?;
    bot_logging::initialize(config.log_destination, config.log_level);
    bot_info!("Starting linkbot {}", env!("CARGO_PKG_VERSION"));
    bot_info!("{config:?}");

    app::run(config).await
}
