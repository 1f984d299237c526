// SPDX-License-Identifier: BUSL-1.1

use std::time::Duration;

use super::*;

#[tokio::test(start_paused = true)]
async fn fast_handler_is_on_time() {
    let (out, outcome) = time_handler("topic", Duration::from_secs(1), Duration::from_secs(5), async {
        42
    })
    .await;
    assert_eq!(out, 42);
    assert_eq!(outcome, TimingOutcome::OnTime);
}

#[tokio::test(start_paused = true)]
async fn slow_handler_exceeds_warning_but_not_error() {
    let handler = async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        "done"
    };
    let (out, outcome) =
        time_handler("topic", Duration::from_millis(100), Duration::from_secs(5), handler).await;
    assert_eq!(out, "done");
    assert_eq!(outcome, TimingOutcome::ExceededWarning);
}

#[tokio::test(start_paused = true)]
async fn very_slow_handler_exceeds_error() {
    let handler = async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        "done"
    };
    let (out, outcome) =
        time_handler("topic", Duration::from_millis(50), Duration::from_millis(100), handler).await;
    assert_eq!(out, "done");
    assert_eq!(outcome, TimingOutcome::ExceededError);
}
