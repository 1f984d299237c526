// SPDX-License-Identifier: BUSL-1.1

use std::time::Duration;

use super::*;
use crate::client::{ConfigResponse, TestDoubleClient};
use crate::error::FetchError;
use crate::led::LedStatus;

fn checkpoint_path() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint").join("lastconfig");
    (dir, path)
}

#[tokio::test]
async fn success_checkpoints_body_and_updates_hash() {
    let (_dir, path) = checkpoint_path();
    let uplinks = vec![TestDoubleClient::new(vec![Ok(ConfigResponse::Modified(b"cfg-v1".to_vec()))])];
    let mut fetcher = ConfigFetcher::new(uplinks, path.clone(), Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::Success);
    assert_eq!(result.body, Some(b"cfg-v1".to_vec()));
    assert_eq!(fetcher.led_status(), LedStatus::Connected);
    assert_eq!(fetcher.last_accepted_hash(), config_hash(b"cfg-v1"));

    let saved = tokio::fs::read(&path).await.unwrap();
    assert_eq!(saved, b"cfg-v1");
}

#[tokio::test]
async fn not_modified_keeps_previous_hash() {
    let (_dir, path) = checkpoint_path();
    let uplinks = vec![TestDoubleClient::new(vec![Ok(ConfigResponse::NotModified)])];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::NotModified);
    assert_eq!(result.body, None);
    assert_eq!(fetcher.led_status(), LedStatus::Connected);
}

#[tokio::test]
async fn first_success_among_uplinks_wins() {
    let (_dir, path) = checkpoint_path();
    let uplinks = vec![
        TestDoubleClient::new(vec![Err(FetchError::Temporary("down".to_string()))]),
        TestDoubleClient::new(vec![Ok(ConfigResponse::Modified(b"from-second".to_vec()))]),
    ];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::Success);
    assert_eq!(result.body, Some(b"from-second".to_vec()));
}

#[tokio::test]
async fn all_uplinks_failing_with_no_checkpoint_is_temporary_fail() {
    let (_dir, path) = checkpoint_path();
    let uplinks = vec![
        TestDoubleClient::new(vec![Err(FetchError::Temporary("down".to_string()))]),
        TestDoubleClient::new(vec![Err(FetchError::Temporary("also down".to_string()))]),
    ];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::TemporaryFail);
    assert_eq!(fetcher.led_status(), LedStatus::NoNetwork);
}

#[tokio::test]
async fn all_uplinks_permanently_failing_with_no_checkpoint_is_fail() {
    let (_dir, path) = checkpoint_path();
    let uplinks = vec![TestDoubleClient::new(vec![Err(FetchError::Permanent("rejected".to_string()))])];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::Fail);
}

#[tokio::test]
async fn falls_back_to_fresh_checkpoint_when_all_uplinks_fail() {
    let (_dir, path) = checkpoint_path();
    checkpoint::save(&path, b"saved-cfg").await.unwrap();

    let uplinks = vec![TestDoubleClient::new(vec![Err(FetchError::Temporary("down".to_string()))])];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::ReadSaved);
    assert_eq!(result.body, Some(b"saved-cfg".to_vec()));
    assert_eq!(fetcher.led_status(), LedStatus::ReadingSaved);
}

#[tokio::test]
async fn stale_checkpoint_is_not_used_as_fallback() {
    let (_dir, path) = checkpoint_path();
    checkpoint::save(&path, b"old-cfg").await.unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));

    let uplinks = vec![TestDoubleClient::new(vec![Err(FetchError::Temporary("down".to_string()))])];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_millis(0));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::TemporaryFail);
    assert_eq!(result.body, None);
}

#[tokio::test]
async fn empty_uplink_list_fails_without_panicking() {
    let (_dir, path) = checkpoint_path();
    let uplinks: Vec<TestDoubleClient> = vec![];
    let mut fetcher = ConfigFetcher::new(uplinks, path, Duration::from_secs(600));

    let result = fetcher.poll_once().await;
    assert_eq!(result.outcome, FetchOutcome::Fail);
}
