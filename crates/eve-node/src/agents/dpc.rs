// SPDX-License-Identifier: BUSL-1.1

//! `nim` (network interface manager) wiring for `eve-dpc`'s `DpcSelector`.

use std::sync::Arc;

use eve_agent::{wait_for_global_config, Watchdog};
use eve_dpc::{DpcSelector, TestDoubleTester};
use eve_pubsub::Subscription;
use eve_types::DevicePortConfigList;

use crate::state::NodeState;

pub fn spawn(state: Arc<NodeState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let global_sub = match Subscription::activate(&state.global_config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "nim: failed to activate GlobalConfig subscription");
                return;
            }
        };
        let cfg = wait_for_global_config(&global_sub).await;

        let port_sub = match Subscription::activate(&state.device_port_config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "nim: failed to activate DevicePortConfig subscription");
                return;
            }
        };
        while !port_sub.synchronized() {
            if port_sub.recv().await.is_none() {
                break;
            }
        }

        // Reachability testing is an external collaborator this workspace has
        // no crate for (spec §1 scopes out "iptables/netlink command
        // construction"); the standing double below trusts every candidate,
        // a conservative placeholder until a real netlink/ICMP collaborator
        // is wired in by the operator environment.
        let entries: Vec<_> = port_sub.get_all().await.into_values().collect();
        let reachable = entries.iter().map(|d| d.key.clone()).collect();
        let list = DevicePortConfigList { entries, current_index: None };
        let mut selector = DpcSelector::new(list, TestDoubleTester { reachable }, &cfg);
        selector.select_initial();
        state.device_port_config.signal_restarted().await.ok();

        Watchdog::new(&state.config.watchdog_dir, "nim").spawn(state.shutdown.clone());
        let mut test_ticker = tokio::time::interval(selector.test_interval());
        test_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut better_ticker = tokio::time::interval(selector.better_interval());
        better_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                event = port_sub.recv() => {
                    if event.is_none() {
                        break;
                    }
                    let entries: Vec<_> = port_sub.get_all().await.into_values().collect();
                    selector = DpcSelector::new(
                        DevicePortConfigList { entries, current_index: selector.list().current_index },
                        TestDoubleTester { reachable: selector.list().entries.iter().map(|d| d.key.clone()).collect() },
                        &cfg,
                    );
                }
                _ = test_ticker.tick() => {
                    selector.retest_current(eve_types::epoch_ms()).await;
                }
                _ = better_ticker.tick() => {
                    selector.try_better(eve_types::epoch_ms()).await;
                }
            }
        }
    })
}
