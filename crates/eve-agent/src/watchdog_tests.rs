// SPDX-License-Identifier: BUSL-1.1

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test(start_paused = true)]
async fn touch_file_created_on_tick() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = CancellationToken::new();
    let watchdog =
        Watchdog::new(dir.path(), "testagent").with_interval(Duration::from_millis(10));
    let handle = watchdog.spawn(shutdown.clone());

    tokio::time::advance(Duration::from_millis(15)).await;
    tokio::task::yield_now().await;

    let touch_path = dir.path().join("testagent.touch");
    assert!(touch_path.exists());

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn spawn_exits_promptly_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = CancellationToken::new();
    let watchdog =
        Watchdog::new(dir.path(), "testagent").with_interval(Duration::from_secs(3600));
    let handle = watchdog.spawn(shutdown.clone());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}
