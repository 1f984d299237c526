// SPDX-License-Identifier: BUSL-1.1

//! Base-OS upgrade/rollback FSM and reboot coordination (spec §4.D).

mod fsm;
mod reboot;

pub use fsm::{UpgradeAction, UpgradeFsm, UpgradeState, DEFAULT_REMAINING_TEST_TIME_S};
pub use reboot::{bump_restart_counter, load_restart_counter, save_restart_counter, RebootRequest};
