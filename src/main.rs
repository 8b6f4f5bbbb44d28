//! Entry point wiring CLI dispatch to the store and search pipeline.

use anyhow::Result;
use news_digest::{cli::Cli, config::Settings, logging};
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load()?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
