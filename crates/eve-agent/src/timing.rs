// SPDX-License-Identifier: BUSL-1.1

//! Bounded handler timing (spec §4.B): "handler invocations must complete
//! within a bounded warningTime (log-only) and errorTime (escalated), each
//! measured per topic."

use std::time::Duration;

/// Outcome of timing a handler invocation, used by callers that need to
/// escalate past logging (e.g. counting consecutive `errorTime` breaches
/// toward a fatal watchdog condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingOutcome {
    OnTime,
    ExceededWarning,
    ExceededError,
}

/// Run `fut` to completion, logging once if it runs past `warning` and again
/// (escalated) if it runs past `error`. Never cancels `fut` — EVE agents run
/// handlers to completion; this only observes and reports duration.
pub async fn time_handler<Fut: std::future::Future>(
    topic: &str,
    warning: Duration,
    error: Duration,
    fut: Fut,
) -> (Fut::Output, TimingOutcome) {
    tokio::pin!(fut);

    tokio::select! {
        biased;
        out = &mut fut => return (out, TimingOutcome::OnTime),
        _ = tokio::time::sleep(warning) => {
            tracing::warn!(topic, warning_ms = warning.as_millis(), "handler exceeded warningTime");
        }
    }

    let remaining = error.saturating_sub(warning);
    tokio::select! {
        biased;
        out = &mut fut => return (out, TimingOutcome::ExceededWarning),
        _ = tokio::time::sleep(remaining) => {
            tracing::error!(topic, error_ms = error.as_millis(), "handler exceeded errorTime");
        }
    }

    (fut.await, TimingOutcome::ExceededError)
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
