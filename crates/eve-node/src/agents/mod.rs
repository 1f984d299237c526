// SPDX-License-Identifier: BUSL-1.1

//! One `tokio::spawn` per agent, each coupled to the others only through
//! `NodeState`'s publications — grounded on
//! `coop_mux::upstream::health::spawn_health_checker`'s shape (one
//! `tokio::select!` loop per background task, reading `state.shutdown`).

mod attest;
mod config_fetch;
mod dpc;
mod upgrade;
mod verify;

use std::sync::Arc;

use crate::state::NodeState;

/// Spawn every agent task. Returns their join handles so the caller can
/// await a clean shutdown.
pub fn spawn_all(state: Arc<NodeState>) -> Vec<tokio::task::JoinHandle<()>> {
    vec![
        dpc::spawn(Arc::clone(&state)),
        config_fetch::spawn(Arc::clone(&state)),
        upgrade::spawn(Arc::clone(&state)),
        attest::spawn(Arc::clone(&state)),
        verify::spawn(state),
    ]
}
