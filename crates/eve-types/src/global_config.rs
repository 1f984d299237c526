// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::Publishable;

/// The single persistent key under which `GlobalConfig` is published
/// (spec §3: "a persistent publication with exactly one key `global`").
pub const GLOBAL_CONFIG_KEY: &str = "global";

/// `network.fallback.any.eth` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackAnyEth {
    Enabled,
    Disabled,
}

/// `debug.default.loglevel` / `debug.default.remote.loglevel` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

/// Runtime-adjustable settings delivered by the controller (spec §6).
///
/// Unlike process-launch flags (`clap`-derived configs in the binary
/// crates), this table is itself a published, persistent value: a single
/// instance lives under [`GLOBAL_CONFIG_KEY`] and is the one settings
/// object every other agent subscribes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub timer_config_interval_s: u64,
    pub timer_metric_interval_s: u64,
    pub timer_send_timeout_s: u64,
    pub timer_reboot_no_network_s: u64,
    pub timer_update_fallback_no_network_s: u64,
    pub timer_test_baseimage_update_s: u64,
    pub timer_use_config_checkpoint_s: u64,
    pub timer_port_testinterval_s: u64,
    pub timer_port_testbetterinterval_s: u64,
    pub timer_port_timeout_s: u64,
    pub timer_download_retry_s: u64,
    pub timer_gc_vdisk_s: u64,
    pub network_fallback_any_eth: FallbackAnyEth,
    pub debug_default_loglevel: LogLevel,
    pub debug_default_remote_loglevel: LogLevel,
    /// `agent.<name>.` prefixed overrides, keyed by the full dotted option
    /// name (e.g. `"agent.zedagent.timer.config.interval"`).
    #[serde(default)]
    pub agent_overrides: std::collections::BTreeMap<String, u64>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            timer_config_interval_s: 60,
            timer_metric_interval_s: 60,
            timer_send_timeout_s: 120,
            timer_reboot_no_network_s: 604_800,
            timer_update_fallback_no_network_s: 300,
            timer_test_baseimage_update_s: 600,
            timer_use_config_checkpoint_s: 600,
            timer_port_testinterval_s: 300,
            timer_port_testbetterinterval_s: 600,
            timer_port_timeout_s: 15,
            timer_download_retry_s: 600,
            timer_gc_vdisk_s: 3600,
            network_fallback_any_eth: FallbackAnyEth::Enabled,
            debug_default_loglevel: LogLevel::Info,
            debug_default_remote_loglevel: LogLevel::Warning,
            agent_overrides: Default::default(),
        }
    }
}

impl GlobalConfig {
    /// Per-agent override lookup, falling back to the global value.
    ///
    /// `option` is the bare dotted option name, e.g. `"timer.config.interval"`;
    /// this looks up `"agent.<agent_name>.<option>"` first.
    pub fn agent_override(&self, agent_name: &str, option: &str) -> Option<u64> {
        self.agent_overrides.get(&format!("agent.{agent_name}.{option}")).copied()
    }

    /// Clamp and validate fields that the controller cannot be trusted to
    /// send sanely. Returns the clamped config; never fails — an
    /// out-of-range value is corrected rather than rejected wholesale, so a
    /// single bad option cannot take the whole config offline.
    ///
    /// `timer.config.interval = 0` is explicitly rejected per spec §8
    /// ("Boundary behaviors"): it is clamped up to a 10s floor rather than
    /// accepted as "poll continuously".
    pub fn clamped(mut self) -> Self {
        const MIN_CONFIG_INTERVAL_S: u64 = 10;
        if self.timer_config_interval_s < MIN_CONFIG_INTERVAL_S {
            self.timer_config_interval_s = MIN_CONFIG_INTERVAL_S;
        }
        if self.timer_send_timeout_s == 0 {
            self.timer_send_timeout_s = 1;
        }
        if self.timer_port_timeout_s == 0 {
            self.timer_port_timeout_s = 1;
        }
        self
    }
}

impl Publishable for GlobalConfig {
    fn key(&self) -> String {
        GLOBAL_CONFIG_KEY.to_string()
    }

    fn topic_name() -> &'static str {
        "GlobalConfig"
    }
}

#[cfg(test)]
#[path = "global_config_tests.rs"]
mod tests;
