// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::Publishable;

/// The single key under which `AttestContext` is published.
pub const ATTEST_CONTEXT_KEY: &str = "attest";

/// Nonce/quote/escrow protocol state with the controller (spec §3, §4.E).
///
/// `integrity_token` is `None` until a successful `RequestQuote`, and is
/// cleared by the FSM whenever the controller returns 403.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttestContext {
    pub nonce: Option<Vec<u8>>,
    pub internal_quote: Option<Vec<u8>>,
    pub escrow_data: Option<Vec<u8>>,
    /// Uplink rotation counter, incremented on each controller retry.
    pub iteration: u32,
    pub event_log: Vec<String>,
    pub integrity_token: Option<Vec<u8>>,
}

impl Publishable for AttestContext {
    fn key(&self) -> String {
        ATTEST_CONTEXT_KEY.to_string()
    }

    fn topic_name() -> &'static str {
        "AttestContext"
    }
}

#[cfg(test)]
#[path = "attest_tests.rs"]
mod tests;
