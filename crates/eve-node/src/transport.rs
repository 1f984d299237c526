// SPDX-License-Identifier: BUSL-1.1

//! Local operator HTTP surface, grounded on the teacher's
//! `transport::http::health` handler shape. Read-only: a snapshot of each
//! agent's published status, for `eve-cli status` to poll.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::NodeState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub node_agent_status: Vec<eve_types::NodeAgentStatus>,
    pub zboot_status: Vec<eve_types::ZbootStatus>,
    pub device_port_config: Vec<eve_types::DevicePortConfig>,
    pub attest_context: Vec<eve_types::AttestContext>,
    pub verify_image_status: Vec<eve_types::VerifyImageStatus>,
}

/// `GET /status` — a snapshot of every topic this node publishes.
pub async fn status(State(state): State<Arc<NodeState>>) -> impl IntoResponse {
    Json(StatusResponse {
        node_agent_status: state.node_agent_status.get_all().await.into_values().collect(),
        zboot_status: state.zboot_status.get_all().await.into_values().collect(),
        device_port_config: state.device_port_config.get_all().await.into_values().collect(),
        attest_context: state.attest_context.get_all().await.into_values().collect(),
        verify_image_status: state.verify_image_status.get_all().await.into_values().collect(),
    })
}

/// `GET /healthz` — liveness only, no auth, mirrors the teacher's exempt
/// health route.
pub async fn healthz() -> impl IntoResponse {
    "ok"
}

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
