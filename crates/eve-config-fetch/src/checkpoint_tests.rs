// SPDX-License-Identifier: BUSL-1.1

use std::time::Duration;

use super::*;

#[tokio::test]
async fn save_then_load_fresh_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkpoint").join("lastconfig");
    save(&path, b"config body").await.expect("save");

    let loaded = load_if_fresh(&path, Duration::from_secs(600)).await;
    assert_eq!(loaded, Some(b"config body".to_vec()));
}

#[tokio::test]
async fn missing_checkpoint_loads_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkpoint").join("lastconfig");
    let loaded = load_if_fresh(&path, Duration::from_secs(600)).await;
    assert_eq!(loaded, None);
}

#[tokio::test]
async fn stale_checkpoint_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkpoint").join("lastconfig");
    save(&path, b"old body").await.expect("save");

    // Zero max-age means anything but an instantaneous re-read is stale.
    std::thread::sleep(std::time::Duration::from_millis(5));
    let loaded = load_if_fresh(&path, Duration::from_millis(0)).await;
    assert_eq!(loaded, None);
}

#[test]
fn default_path_matches_spec_layout() {
    let root = std::path::Path::new("/persist");
    assert_eq!(default_path(root), std::path::PathBuf::from("/persist/checkpoint/lastconfig"));
}
