use clap::Parser;
use log::info;
use trackrec::clients::errors::Result;

use crate::recommender;

#[derive(Parser)]
#[command(name = "trackrec")]
#[command(
    version,
    about = "Get similar-track recommendations from Spotify based on what you're listening to",
    long_about = None
)]
struct Cli {}

pub async fn run() -> Result<()> {
    let _cli = Cli::parse();

    info!("Building config ...");
    let config = recommender::ConfigBuilder::new().build()?;
    info!("Authorizing Spotify client ...");
    config.catalog.authorize().await?;

    let recommender = recommender::Recommender::new(config);
    recommender.run().await
}
