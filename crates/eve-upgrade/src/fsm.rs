// SPDX-License-Identifier: BUSL-1.1

//! Base-OS upgrade/rollback state machine (spec §4.D), running on the node
//! after boot.

use eve_types::PartitionState;

pub const DEFAULT_REMAINING_TEST_TIME_S: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeState {
    /// Current partition is `active`. No upgrade in flight.
    Stable,
    /// Current partition is `inprogress`; the test window is counting down.
    Testing,
    /// The controller acknowledged the test; ready to promote to `active`.
    Committed,
    /// The test failed or the controller was unreachable past the fallback
    /// timer; the other partition should be rebooted into.
    RollingBack,
}

/// An action the caller must carry out as a result of an FSM transition.
/// The actual partition write / reboot trigger is an external collaborator
/// (spec §1); the FSM only decides when one is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeAction {
    None,
    /// Promote the current (testing) partition to `active`.
    PromoteToActive,
    /// Request a reboot into the other partition, carrying the reason that
    /// ends up in `NodeAgentStatus::reboot_reason`.
    RequestReboot { reason: String },
}

pub struct UpgradeFsm {
    state: UpgradeState,
    /// Millis at which `Testing` was entered; `None` outside that state.
    test_entered_ms: Option<u64>,
    /// Millis of the most recent confirmed controller reach (any of
    /// Success/NotModified/ReadSaved from the config fetcher).
    last_controller_reach_ms: u64,
    min_dwell_s: u64,
    remaining_test_time_s: u64,
}

impl UpgradeFsm {
    pub fn new(min_dwell_s: u64) -> Self {
        Self {
            state: UpgradeState::Stable,
            test_entered_ms: None,
            last_controller_reach_ms: 0,
            min_dwell_s,
            remaining_test_time_s: DEFAULT_REMAINING_TEST_TIME_S,
        }
    }

    pub fn state(&self) -> UpgradeState {
        self.state
    }

    pub fn remaining_test_time_s(&self) -> u64 {
        self.remaining_test_time_s
    }

    /// `Stable → Testing` on boot when the current partition reports
    /// `inprogress` (spec §4.D).
    pub fn on_boot(&mut self, current_partition: PartitionState, now_ms: u64) {
        if self.state == UpgradeState::Stable && current_partition == PartitionState::Inprogress {
            self.state = UpgradeState::Testing;
            self.test_entered_ms = Some(now_ms);
            self.last_controller_reach_ms = now_ms;
            self.remaining_test_time_s = DEFAULT_REMAINING_TEST_TIME_S;
            tracing::info!("upgrade FSM entering Testing on boot");
        }
    }

    /// Record that the controller was reached this poll cycle (a
    /// `Success`/`NotModified`/`ReadSaved` config-fetch outcome), resetting
    /// the fallback clock.
    pub fn record_controller_reach(&mut self, now_ms: u64) {
        self.last_controller_reach_ms = now_ms;
    }

    /// `Testing → Committed` when zedagent reports `ConfigGetSuccess` for
    /// the first time after the minimum dwell, and the attestation FSM
    /// holds a valid integrity token.
    pub fn on_config_get_success(&mut self, now_ms: u64, has_valid_integrity_token: bool) -> UpgradeAction {
        if self.state != UpgradeState::Testing {
            return UpgradeAction::None;
        }
        self.record_controller_reach(now_ms);
        let dwell_ok = self
            .test_entered_ms
            .map(|t| now_ms.saturating_sub(t) >= self.min_dwell_s * 1000)
            .unwrap_or(false);
        if dwell_ok && has_valid_integrity_token {
            self.state = UpgradeState::Committed;
            tracing::info!("upgrade FSM committing after successful test window");
            return UpgradeAction::PromoteToActive;
        }
        UpgradeAction::None
    }

    /// Periodic tick: `Testing → Rolling back` once
    /// `timer.update.fallback.no.network` elapses without controller reach.
    pub fn tick(&mut self, now_ms: u64, fallback_no_network_s: u64) -> UpgradeAction {
        if self.state != UpgradeState::Testing {
            return UpgradeAction::None;
        }
        if let Some(entered) = self.test_entered_ms {
            let elapsed_s = now_ms.saturating_sub(entered) / 1000;
            self.remaining_test_time_s = DEFAULT_REMAINING_TEST_TIME_S.saturating_sub(elapsed_s);
        }
        let unreached_s = now_ms.saturating_sub(self.last_controller_reach_ms) / 1000;
        if unreached_s > fallback_no_network_s {
            self.state = UpgradeState::RollingBack;
            tracing::warn!(unreached_s, "upgrade FSM rolling back: controller unreachable past fallback timer");
            return UpgradeAction::RequestReboot { reason: "Fallback: controller unreachable during test".to_string() };
        }
        UpgradeAction::None
    }
}

#[cfg(test)]
#[path = "fsm_tests.rs"]
mod tests;
