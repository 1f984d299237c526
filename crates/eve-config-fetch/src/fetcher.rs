// SPDX-License-Identifier: BUSL-1.1

//! The periodic poll task itself (spec §4.C).

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use crate::checkpoint;
use crate::client::{ConfigResponse, ControllerClient};
use crate::error::FetchError;
use crate::hash::config_hash;
use crate::led::LedStatus;

/// Classification of a completed poll (spec §4.C step 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    NotModified,
    /// All remote attempts failed; a fresh-enough checkpoint was used instead.
    ReadSaved,
    TemporaryFail,
    Fail,
}

/// Result of one poll iteration: the classification, the new body (only
/// present on `Success`/`ReadSaved`), and the hash it should be compared
/// against next time.
pub struct PollResult {
    pub outcome: FetchOutcome,
    pub body: Option<Vec<u8>>,
    pub accepted_hash: Option<String>,
}

/// Drives the periodic controller poll over a set of eligible uplinks.
pub struct ConfigFetcher<C: ControllerClient> {
    uplinks: Vec<C>,
    iteration: u64,
    checkpoint_path: PathBuf,
    stale_config_time: Duration,
    led_status: LedStatus,
    last_accepted_hash: String,
}

impl<C: ControllerClient> ConfigFetcher<C> {
    pub fn new(uplinks: Vec<C>, checkpoint_path: PathBuf, stale_config_time: Duration) -> Self {
        Self {
            uplinks,
            iteration: 0,
            checkpoint_path,
            stale_config_time,
            led_status: LedStatus::NoNetwork,
            last_accepted_hash: String::new(),
        }
    }

    pub fn led_status(&self) -> LedStatus {
        self.led_status
    }

    pub fn last_accepted_hash(&self) -> &str {
        &self.last_accepted_hash
    }

    /// `GlobalConfig.ConfigInterval` ± 30% jitter (spec §4.C).
    pub fn jittered_interval(base: Duration) -> Duration {
        let mut rng = rand::rng();
        let factor: f64 = rng.random_range(0.7..=1.3);
        Duration::from_secs_f64(base.as_secs_f64() * factor)
    }

    /// Run a single poll: try each eligible uplink in priority order,
    /// starting at an offset rotated by the iteration counter, falling back
    /// to the checkpoint if every uplink failed.
    pub async fn poll_once(&mut self) -> PollResult {
        let attempt = self.try_uplinks().await;
        self.iteration = self.iteration.wrapping_add(1);

        match attempt {
            UplinkAttempt::Success(body) => {
                let hash = config_hash(&body);
                if let Err(e) = checkpoint::save(&self.checkpoint_path, &body).await {
                    tracing::warn!(err = %e, "failed to checkpoint config");
                }
                self.last_accepted_hash = hash.clone();
                self.led_status = LedStatus::Connected;
                PollResult { outcome: FetchOutcome::Success, body: Some(body), accepted_hash: Some(hash) }
            }
            UplinkAttempt::NotModified => {
                self.led_status = LedStatus::Connected;
                PollResult {
                    outcome: FetchOutcome::NotModified,
                    body: None,
                    accepted_hash: Some(self.last_accepted_hash.clone()),
                }
            }
            UplinkAttempt::AllFailed { any_temporary } => {
                self.led_status = LedStatus::NoController;
                match checkpoint::load_if_fresh(&self.checkpoint_path, self.stale_config_time).await {
                    Some(body) => {
                        let hash = config_hash(&body);
                        self.led_status = LedStatus::ReadingSaved;
                        PollResult { outcome: FetchOutcome::ReadSaved, body: Some(body), accepted_hash: Some(hash) }
                    }
                    None => {
                        self.led_status = LedStatus::NoNetwork;
                        let outcome = if any_temporary { FetchOutcome::TemporaryFail } else { FetchOutcome::Fail };
                        PollResult { outcome, body: None, accepted_hash: None }
                    }
                }
            }
        }
    }

    /// Attempt each uplink once, starting at the rotated offset. Returns the
    /// first `Success` or `NotModified`, or the aggregate failure otherwise
    /// (spec §4.C "Tie-breaks": first success wins).
    async fn try_uplinks(&self) -> UplinkAttempt {
        if self.uplinks.is_empty() {
            return UplinkAttempt::AllFailed { any_temporary: false };
        }
        let n = self.uplinks.len();
        let offset = (self.iteration as usize) % n;
        let mut any_temporary = false;

        for i in 0..n {
            let idx = (offset + i) % n;
            match self.uplinks[idx].fetch_config(&self.last_accepted_hash).await {
                Ok(ConfigResponse::Modified(body)) => return UplinkAttempt::Success(body),
                Ok(ConfigResponse::NotModified) => return UplinkAttempt::NotModified,
                Err(FetchError::Temporary(msg)) => {
                    any_temporary = true;
                    tracing::debug!(uplink = idx, err = %msg, "uplink poll failed (temporary)");
                }
                Err(FetchError::Permanent(msg)) => {
                    tracing::warn!(uplink = idx, err = %msg, "uplink poll failed (permanent)");
                }
            }
        }

        UplinkAttempt::AllFailed { any_temporary }
    }
}

enum UplinkAttempt {
    Success(Vec<u8>),
    NotModified,
    AllFailed { any_temporary: bool },
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
