use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rolodex::{Config, Server, app};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!(public_dir = %config.public_dir.display(), "serving static files");

    Server::new(config.addr).serve(app(config.public_dir)).await?;
    Ok(())
}
