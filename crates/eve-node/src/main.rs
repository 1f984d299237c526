// SPDX-License-Identifier: BUSL-1.1

use clap::Parser;
use tracing::error;

use eve_node::config::NodeConfig;

#[tokio::main]
async fn main() {
    let config = NodeConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = eve_node::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
