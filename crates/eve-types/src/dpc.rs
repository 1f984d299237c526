// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::Publishable;

/// Physical medium of a port, resolving spec §9 Open Question 3: "usable"
/// for non-Ethernet ports is codified per-kind rather than left ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    Ethernet,
    Wifi,
    Cellular,
}

/// Cellular/LTE modem connection state (only meaningful for `PortKind::Cellular`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModemState {
    Disabled,
    Registering,
    Connected,
}

/// DHCP configuration mode for a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DhcpMode {
    None,
    Client,
    Static,
}

/// A single port within a [`DevicePortConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortConfig {
    pub if_name: String,
    pub kind: PortKind,
    pub is_mgmt: bool,
    pub dhcp: DhcpMode,
    pub modem_state: Option<ModemState>,
}

impl PortConfig {
    /// A port has "working DHCP" if it is not `DhcpMode::None`, and (for
    /// cellular ports) the modem has completed registration.
    pub fn has_working_dhcp(&self) -> bool {
        if self.dhcp == DhcpMode::None {
            return false;
        }
        match self.kind {
            PortKind::Ethernet | PortKind::Wifi => true,
            PortKind::Cellular => matches!(self.modem_state, Some(ModemState::Connected)),
        }
    }
}

/// A candidate set of port parameters, ordered by `time_priority` (spec §3,
/// §4.G). Newer `time_priority` wins ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePortConfig {
    pub key: String,
    pub time_priority_ms: u64,
    pub ports: Vec<PortConfig>,
    /// Millis since epoch of the last failed test, `0` if never failed.
    pub last_failed_ms: u64,
    /// Millis since epoch of the last successful test, `0` if never succeeded.
    pub last_succeeded_ms: u64,
    pub last_error: String,
}

impl DevicePortConfig {
    /// I4: usable iff at least one management port has working DHCP.
    pub fn is_usable(&self) -> bool {
        self.ports.iter().any(|p| p.is_mgmt && p.has_working_dhcp())
    }

    /// I4/§4.G/§8 I5: testable iff usable and either never failed, or the
    /// last success is newer than the last failure, or more than 60s have
    /// elapsed since the last failure.
    pub fn is_testable(&self, now_ms: u64) -> bool {
        if !self.is_usable() {
            return false;
        }
        const RETEST_BACKOFF_MS: u64 = 60_000;
        self.last_failed_ms == 0
            || self.last_succeeded_ms > self.last_failed_ms
            || now_ms.saturating_sub(self.last_failed_ms) > RETEST_BACKOFF_MS
    }
}

impl Publishable for DevicePortConfig {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn topic_name() -> &'static str {
        "DevicePortConfig"
    }
}

/// Convenience ordered collection, as selected over by `eve-dpc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicePortConfigList {
    pub entries: Vec<DevicePortConfig>,
    pub current_index: Option<usize>,
}

impl DevicePortConfigList {
    /// Entries sorted by descending `time_priority_ms` (highest priority first).
    pub fn sorted_by_priority(&self) -> Vec<&DevicePortConfig> {
        let mut v: Vec<&DevicePortConfig> = self.entries.iter().collect();
        v.sort_by(|a, b| b.time_priority_ms.cmp(&a.time_priority_ms));
        v
    }

    pub fn current(&self) -> Option<&DevicePortConfig> {
        self.current_index.and_then(|i| self.entries.get(i))
    }
}

#[cfg(test)]
#[path = "dpc_tests.rs"]
mod tests;
