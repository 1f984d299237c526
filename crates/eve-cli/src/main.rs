// SPDX-License-Identifier: BUSL-1.1

use clap::Parser;
use tracing::error;

mod status;

use eve_node::config::NodeConfig;

#[derive(Parser)]
#[command(name = "eve-cli", version, about = "Operator CLI for the EVE node agent runtime.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the node: boot every agent and serve the local status endpoint.
    Run(NodeConfig),
    /// Query a running node's status endpoint.
    Status(status::StatusArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Run(config) => {
            if let Err(e) = eve_node::run(config).await {
                error!("fatal: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Status(args) => {
            std::process::exit(status::run(&args).await);
        }
    }
}
