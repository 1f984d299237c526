// SPDX-License-Identifier: BUSL-1.1

//! EVE node: boots every on-device agent as a tokio task sharing one
//! `eve-pubsub` bus, grounded on the teacher's `coop_mux::run` shape.

pub mod agents;
pub mod config;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::NodeConfig;
use crate::state::NodeState;

/// Run the node until shutdown: spawn all agents, then serve the local
/// operator status endpoint until the listener's graceful shutdown fires.
pub async fn run(config: NodeConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let state = Arc::new(NodeState::new(config, shutdown.clone()));

    tracing::info!("eve-node starting agents");
    let handles = agents::spawn_all(Arc::clone(&state));

    let router = transport::build_router(Arc::clone(&state));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "eve-node status endpoint listening");
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    shutdown.cancel();
    for handle in handles {
        let _ = handle.await;
    }

    Ok(())
}
