use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use price_report::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_report=info".parse()?),
        )
        .init();

    info!("Starting Price Report");

    // Load configuration
    let config = Arc::new(Config::load()?);

    match price_report::run(config.clone()).await {
        Ok(summary) => {
            summary.log(&config);
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {:#}", e);
            Err(e)
        }
    }
}
