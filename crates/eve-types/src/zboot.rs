// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::Publishable;

/// Role of a partition in the A/B upgrade scheme (spec §4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionState {
    /// Currently booted and committed.
    Active,
    /// Currently booted, newly installed, under test.
    Inprogress,
    /// Being written.
    Updating,
    Unused,
}

/// Per-partition boot status (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZbootStatus {
    pub partition_label: String,
    pub current_partition: bool,
    pub partition_state: PartitionState,
}

impl Publishable for ZbootStatus {
    fn key(&self) -> String {
        self.partition_label.clone()
    }

    fn topic_name() -> &'static str {
        "ZbootStatus"
    }
}

/// I6: exactly one partition has `current_partition=true`.
pub fn exactly_one_current(statuses: &[ZbootStatus]) -> bool {
    statuses.iter().filter(|s| s.current_partition).count() == 1
}

#[cfg(test)]
#[path = "zboot_tests.rs"]
mod tests;
