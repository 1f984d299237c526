// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::Publishable;

pub const NODE_AGENT_STATUS_KEY: &str = "nodeagent";

/// Heartbeat and reboot-coordination record (spec §3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAgentStatus {
    pub update_inprogress: bool,
    pub remaining_test_time_s: u64,
    pub reboot_reason: String,
    /// Truncated to 1600 chars per spec §4.D.
    pub reboot_stack: String,
    pub reboot_time_ms: u64,
    pub restart_counter: u64,
}

impl NodeAgentStatus {
    /// §4.D: "RebootStack (truncated to 1600 chars)".
    pub fn set_reboot_stack(&mut self, stack: impl AsRef<str>) {
        const MAX_LEN: usize = 1600;
        let s = stack.as_ref();
        self.reboot_stack = match s.char_indices().nth(MAX_LEN) {
            Some((byte_idx, _)) => s[..byte_idx].to_string(),
            None => s.to_string(),
        };
    }
}

impl Publishable for NodeAgentStatus {
    fn key(&self) -> String {
        NODE_AGENT_STATUS_KEY.to_string()
    }

    fn topic_name() -> &'static str {
        "NodeAgentStatus"
    }
}

#[cfg(test)]
#[path = "node_agent_tests.rs"]
mod tests;
