//! CSP report logger - sanitizes and logs Content-Security-Policy violation
//! reports posted by browsers.

use clap::Parser;
use server::{Cli, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load(&cli)?;

    server::init_tracing(&config)?;
    server::start_server(config).await?;

    Ok(())
}
