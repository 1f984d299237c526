// SPDX-License-Identifier: BUSL-1.1

//! Watchdog touch-file ticker (spec §4.B).
//!
//! Grounded on `coop_mux::upstream::health::spawn_health_checker`'s
//! `tokio::select!` over a `CancellationToken` and an interval ticker.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default still-running period (spec §4.B: "≈25 s period").
pub const DEFAULT_TOUCH_INTERVAL: Duration = Duration::from_secs(25);

/// Touches `<watchdog_dir>/<agent>.touch` on every tick so an external
/// watchdog process can detect a stale (hung or crashed) agent.
pub struct Watchdog {
    touch_path: PathBuf,
    interval: Duration,
}

impl Watchdog {
    pub fn new(watchdog_dir: impl AsRef<Path>, agent_name: &str) -> Self {
        Self {
            touch_path: watchdog_dir.as_ref().join(format!("{agent_name}.touch")),
            interval: DEFAULT_TOUCH_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the touch loop. Exits once `shutdown` is cancelled.
    pub fn spawn(self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if let Err(e) = touch(&self.touch_path).await {
                    tracing::warn!(path = %self.touch_path.display(), err = %e, "watchdog touch failed");
                }
            }
        })
    }
}

async fn touch(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    // O_CREAT|O_TRUNC updates mtime to now even if the file already exists.
    tokio::fs::File::create(path).await?;
    Ok(())
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
