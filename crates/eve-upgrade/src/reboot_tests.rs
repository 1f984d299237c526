// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[tokio::test]
async fn missing_counter_file_loads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restartcounter");
    assert_eq!(load_restart_counter(&path).await, 0);
}

#[tokio::test]
async fn bump_increments_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restartcounter");

    assert_eq!(bump_restart_counter(&path).await.unwrap(), 1);
    assert_eq!(bump_restart_counter(&path).await.unwrap(), 2);
    assert_eq!(load_restart_counter(&path).await, 2);
}

#[tokio::test]
async fn unparseable_content_loads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restartcounter");
    tokio::fs::write(&path, b"not-a-number").await.unwrap();
    assert_eq!(load_restart_counter(&path).await, 0);
}
