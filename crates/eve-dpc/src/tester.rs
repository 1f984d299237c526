// SPDX-License-Identifier: BUSL-1.1

//! Port reachability testing is an external collaborator (spec §1: "specific
//! iptables/netlink command construction" is explicitly out of scope). This
//! trait is the narrow interface the selector reaches through.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use eve_types::DevicePortConfig;

pub trait PortTester: Send + Sync {
    /// Attempt to reach the controller over `dpc`, bounded by `timeout`
    /// (spec §6: `timer.port.timeout`).
    fn test<'a>(
        &'a self,
        dpc: &'a DevicePortConfig,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

/// In-memory test double: succeeds for any DPC whose key is in `reachable`.
#[derive(Debug, Default, Clone)]
pub struct TestDoubleTester {
    pub reachable: std::collections::HashSet<String>,
}

impl PortTester for TestDoubleTester {
    fn test<'a>(
        &'a self,
        dpc: &'a DevicePortConfig,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        let ok = self.reachable.contains(&dpc.key);
        Box::pin(async move { ok })
    }
}

#[cfg(test)]
#[path = "tester_tests.rs"]
mod tests;
