// SPDX-License-Identifier: BUSL-1.1

//! Agent initialization protocol (spec §4.B):
//! 1. create publications before subscriptions (caller's responsibility —
//!    enforced by ordering in the agent's own constructor, not here);
//! 2. activate the `GlobalConfig` subscription and block until synchronized;
//! 3. wait for any sentinel publications this agent depends on;
//! 4. `SignalRestarted()` every publication the agent owns (also the
//!    caller's responsibility, since it has the `Publication` handles).

use eve_pubsub::Subscription;
use eve_types::{GlobalConfig, Publishable};

/// Block until `sub`'s initial snapshot has been delivered, then return the
/// current `GlobalConfig` value (or the default if the controller has not
/// yet published one). Step 2 of the init protocol.
pub async fn wait_for_global_config(sub: &Subscription<GlobalConfig>) -> GlobalConfig {
    while !sub.synchronized() {
        if sub.recv().await.is_none() {
            break;
        }
    }
    sub.get(eve_types::global_config::GLOBAL_CONFIG_KEY).await.unwrap_or_default()
}

/// Block until `key` is present in `sub`'s mirror (step 3: waiting for a
/// sentinel such as "vault unlocked" or "device onboarded" published by
/// another agent).
pub async fn wait_until_present<T: Publishable + 'static>(sub: &Subscription<T>, key: &str) -> T {
    loop {
        if let Some(v) = sub.get(key).await {
            return v;
        }
        if sub.recv().await.is_none() {
            // Publisher gone; caller's `get` will keep returning None. Yield
            // to avoid a hot loop in that degenerate case.
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
