// SPDX-License-Identifier: BUSL-1.1

//! DPC selection policy (spec §4.G).
//!
//! The list itself (`DevicePortConfigList`) is plain data living in
//! `eve-types`, since it is the published/persisted shape. `DpcSelector`
//! is the behavior that runs over it: picking the initial candidate on
//! boot, periodically retesting the current one, and periodically
//! probing whether a higher-priority candidate has become usable again.

use std::time::Duration;

use eve_types::{DevicePortConfig, DevicePortConfigList, GlobalConfig};

use crate::tester::PortTester;

/// Wraps a [`DevicePortConfigList`] with the timers and collaborator needed
/// to run the selection policy described in spec §4.G / §8.5 / §8.6.
pub struct DpcSelector<T: PortTester> {
    list: DevicePortConfigList,
    tester: T,
    test_interval: Duration,
    better_interval: Duration,
    per_attempt_timeout: Duration,
    last_better_check_ms: u64,
}

impl<T: PortTester> DpcSelector<T> {
    pub fn new(list: DevicePortConfigList, tester: T, cfg: &GlobalConfig) -> Self {
        Self {
            list,
            tester,
            test_interval: Duration::from_secs(cfg.timer_port_testinterval_s),
            better_interval: Duration::from_secs(cfg.timer_port_testbetterinterval_s),
            per_attempt_timeout: Duration::from_secs(cfg.timer_port_timeout_s),
            last_better_check_ms: 0,
        }
    }

    pub fn list(&self) -> &DevicePortConfigList {
        &self.list
    }

    pub fn current(&self) -> Option<&DevicePortConfig> {
        self.list.current()
    }

    pub fn test_interval(&self) -> Duration {
        self.test_interval
    }

    pub fn better_interval(&self) -> Duration {
        self.better_interval
    }

    /// Pick the highest-priority usable entry as current. Called once on
    /// boot (spec §4.G: "on startup, select the highest-priority usable
    /// DPC without testing it first").
    pub fn select_initial(&mut self) {
        let key = self
            .list
            .sorted_by_priority()
            .into_iter()
            .find(|d| d.is_usable())
            .map(|d| d.key.clone());
        self.list.current_index = key.and_then(|k| self.index_of(&k));
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.list.entries.iter().position(|d| d.key == key)
    }

    /// Candidates strictly higher priority than `key`, highest first.
    fn higher_priority_than(&self, key: &str) -> Vec<String> {
        let current_priority = self
            .index_of(key)
            .map(|i| self.list.entries[i].time_priority_ms)
            .unwrap_or(0);
        self.list
            .sorted_by_priority()
            .into_iter()
            .filter(|d| d.time_priority_ms > current_priority)
            .map(|d| d.key.clone())
            .collect()
    }

    /// Candidates at or below `key`'s priority, highest first, excluding
    /// `key` itself — the demotion order when the current entry fails.
    fn demotion_order(&self, key: &str) -> Vec<String> {
        let current_priority = self
            .index_of(key)
            .map(|i| self.list.entries[i].time_priority_ms)
            .unwrap_or(u64::MAX);
        self.list
            .sorted_by_priority()
            .into_iter()
            .filter(|d| d.key != key && d.time_priority_ms <= current_priority)
            .map(|d| d.key.clone())
            .collect()
    }

    /// Retest the current entry if it is due (spec §6 `timer.port.testinterval`).
    /// On failure, demote to the next usable entry at or below its priority.
    pub async fn retest_current(&mut self, now_ms: u64) {
        let Some(key) = self.list.current().map(|d| d.key.clone()) else {
            self.select_initial();
            return;
        };
        let Some(idx) = self.index_of(&key) else { return };
        if !self.list.entries[idx].is_testable(now_ms) {
            return;
        }
        let ok = self.tester.test(&self.list.entries[idx], self.per_attempt_timeout).await;
        if ok {
            self.list.entries[idx].last_succeeded_ms = now_ms;
            self.list.entries[idx].last_error.clear();
        } else {
            self.list.entries[idx].last_failed_ms = now_ms;
            self.list.entries[idx].last_error = "port test failed".to_string();
            self.demote_from(&key, now_ms).await;
        }
    }

    /// Switch `current_index` to the next usable, testable entry at or
    /// below `failed_key`'s priority (excluding it). Leaves current
    /// unchanged if none qualify.
    async fn demote_from(&mut self, failed_key: &str, now_ms: u64) {
        for key in self.demotion_order(failed_key) {
            if let Some(idx) = self.index_of(&key) {
                if self.list.entries[idx].is_usable() {
                    self.list.current_index = Some(idx);
                    tracing::warn!(new_current = %key, "demoted DPC after test failure");
                    return;
                }
            }
        }
        let _ = now_ms;
        tracing::error!("no usable DPC remains after demotion");
    }

    /// Probe a higher-priority candidate than current and switch to it on
    /// success (spec §6 `timer.port.testbetterinterval`, §8.6 scenario).
    pub async fn try_better(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_better_check_ms) < self.better_interval.as_millis() as u64 {
            return;
        }
        self.last_better_check_ms = now_ms;

        let Some(current_key) = self.list.current().map(|d| d.key.clone()) else {
            self.select_initial();
            return;
        };

        for key in self.higher_priority_than(&current_key) {
            let Some(idx) = self.index_of(&key) else { continue };
            if !self.list.entries[idx].is_testable(now_ms) {
                continue;
            }
            let ok = self.tester.test(&self.list.entries[idx], self.per_attempt_timeout).await;
            if ok {
                self.list.entries[idx].last_succeeded_ms = now_ms;
                self.list.entries[idx].last_error.clear();
                self.list.current_index = Some(idx);
                tracing::info!(new_current = %key, "promoted to higher-priority DPC");
                return;
            } else {
                self.list.entries[idx].last_failed_ms = now_ms;
                self.list.entries[idx].last_error = "port test failed".to_string();
            }
        }
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
