use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod actor;
mod cli;
mod config;
mod handlers;
mod router;
mod schemas;

use cli::Cli;
use config::DEFAULT_LOG_FILTER;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config::log_filter_from_env()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
