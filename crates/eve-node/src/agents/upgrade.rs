// SPDX-License-Identifier: BUSL-1.1

//! `nodeagent`'s base-OS upgrade/rollback FSM wiring.

use std::sync::Arc;

use eve_agent::{wait_for_global_config, Watchdog};
use eve_pubsub::Subscription;
use eve_types::{epoch_ms, NodeAgentStatus};
use eve_upgrade::{bump_restart_counter, UpgradeAction, UpgradeFsm};

use crate::state::NodeState;

/// Whether the attestation FSM currently holds a validated integrity token,
/// read off the published `AttestContext` (cleared by `tpmmgr` on restart or
/// a controller 403, per its own doc comment).
async fn has_valid_integrity_token(state: &Arc<NodeState>) -> bool {
    state.attest_context.get_all().await.values().any(|ctx| ctx.integrity_token.is_some())
}

pub fn spawn(state: Arc<NodeState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let global_sub = match Subscription::activate(&state.global_config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "nodeagent: failed to activate GlobalConfig subscription");
                return;
            }
        };
        let cfg = wait_for_global_config(&global_sub).await;

        let zboot_sub = match Subscription::activate(&state.zboot_status).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "nodeagent: failed to activate ZbootStatus subscription");
                return;
            }
        };
        while !zboot_sub.synchronized() {
            if zboot_sub.recv().await.is_none() {
                break;
            }
        }

        let restart_counter_path = state.config.persist_root.join("status").join("restart-counter");
        let restart_counter = bump_restart_counter(&restart_counter_path).await.unwrap_or(0);

        let mut fsm = UpgradeFsm::new(cfg.timer_test_baseimage_update_s);
        if let Some(current) = zboot_sub.get_all().await.values().find(|s| s.current_partition) {
            fsm.on_boot(current.partition_state, epoch_ms());
        }

        let mut status = NodeAgentStatus { restart_counter, ..NodeAgentStatus::default() };
        if let Err(e) = state.node_agent_status.publish(status.clone()).await {
            tracing::warn!(err = %e, "failed to publish initial NodeAgentStatus");
        }
        state.node_agent_status.signal_restarted().await.ok();

        let reach_sub = match Subscription::activate(&state.controller_reach).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "nodeagent: failed to activate ControllerReachSignal subscription");
                return;
            }
        };

        Watchdog::new(&state.config.watchdog_dir, "nodeagent").spawn(state.shutdown.clone());
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(5));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                event = zboot_sub.recv() => {
                    if event.is_none() {
                        break;
                    }
                }
                event = reach_sub.recv() => {
                    if event.is_none() {
                        break;
                    }
                    if let Some(signal) = state.controller_reach.get("controller-reach").await {
                        fsm.record_controller_reach(signal.at_ms);
                        if signal.config_get_success {
                            let has_token = has_valid_integrity_token(&state).await;
                            let action = fsm.on_config_get_success(signal.at_ms, has_token);
                            apply_action(&state, &mut status, action).await;
                        }
                    }
                }
                _ = ticker.tick() => {
                    let action = fsm.tick(epoch_ms(), cfg.timer_update_fallback_no_network_s);
                    status.remaining_test_time_s = fsm.remaining_test_time_s();
                    apply_action(&state, &mut status, action).await;
                }
            }
        }
    })
}

async fn apply_action(state: &Arc<NodeState>, status: &mut NodeAgentStatus, action: UpgradeAction) {
    match action {
        UpgradeAction::None => {
            if let Err(e) = state.node_agent_status.publish(status.clone()).await {
                tracing::warn!(err = %e, "failed to publish NodeAgentStatus");
            }
            return;
        }
        UpgradeAction::PromoteToActive => {
            status.update_inprogress = false;
            tracing::info!("promoting test partition to active");
        }
        UpgradeAction::RequestReboot { reason } => {
            status.reboot_reason = reason;
            status.reboot_time_ms = epoch_ms();
            tracing::warn!(reason = %status.reboot_reason, "requesting reboot");
        }
    }
    if let Err(e) = state.node_agent_status.publish(status.clone()).await {
        tracing::warn!(err = %e, "failed to publish NodeAgentStatus");
    }
}
