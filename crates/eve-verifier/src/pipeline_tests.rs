// SPDX-License-Identifier: BUSL-1.1

use eve_types::{ImageState, VerifyImageConfig};
use sha2::{Digest, Sha256};

use super::*;

fn config(image_id: &str, file_name: &str, sha256: &str) -> VerifyImageConfig {
    VerifyImageConfig {
        image_id: image_id.to_string(),
        image_sha256: sha256.to_string(),
        object_type: "baseimage".to_string(),
        file_name: file_name.to_string(),
        signing_cert_der: None,
        signature: None,
    }
}

async fn write_pending(layout: &ImageLayout<'_>, image_id: &str, file_name: &str, bytes: &[u8]) {
    let path = layout.pending_path(image_id, file_name);
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&path, bytes).await.unwrap();
}

fn no_chain_verifier() -> Option<&'static TestDoubleChainVerifier> {
    None
}

#[tokio::test]
async fn unsigned_image_with_matching_sha_is_delivered() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-1", "rootfs.img", b"hello world").await;

    let sha = hex::encode(Sha256::digest(b"hello world"));
    let cfg = config("img-1", "rootfs.img", &sha);

    let status = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await.unwrap();

    assert_eq!(status.state, ImageState::Delivered);
    assert_eq!(status.image_sha256, sha);
    assert!(!status.pending_add);
    assert!(tokio::fs::try_exists(layout.verified_path(&sha, "rootfs.img")).await.unwrap());
    assert!(!tokio::fs::try_exists(layout.verifier_path("img-1", "rootfs.img")).await.unwrap());
}

#[tokio::test]
async fn empty_configured_sha_adopts_computed_hash_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-1", "rootfs.img", b"hello world").await;

    let cfg = config("img-1", "rootfs.img", "");
    let status = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await.unwrap();

    let expected_sha = hex::encode(Sha256::digest(b"hello world"));
    assert_eq!(status.image_sha256, expected_sha);
}

#[tokio::test]
async fn empty_configured_sha_rejected_when_policy_disallows_adoption() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-1", "rootfs.img", b"hello world").await;

    let cfg = config("img-1", "rootfs.img", "");
    let policy = VerifyPolicy { adopt_computed_hash_if_unset: false };
    let result = verify_image(&layout, &cfg, policy, no_chain_verifier()).await;

    assert!(matches!(result, Err((VerifyError::ShaMismatch { .. }, _))));
}

#[tokio::test]
async fn mismatched_sha_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-1", "rootfs.img", b"hello world").await;

    let cfg = config("img-1", "rootfs.img", "0000000000000000000000000000000000000000000000000000000000000000");
    let result = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await;

    assert!(matches!(result, Err((VerifyError::ShaMismatch { .. }, _))));
}

#[tokio::test]
async fn mismatched_sha_preserves_downloaded_status() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-1b", "rootfs.img", b"hello world").await;

    let cfg = config("img-1b", "rootfs.img", "0000000000000000000000000000000000000000000000000000000000000000");
    let result = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await;

    let (_, status) = result.unwrap_err();
    assert_eq!(status.state, ImageState::Downloaded);
    assert!(!status.pending_add);
}

#[tokio::test]
async fn dedup_hit_skips_signature_check_and_discards_pending_copy() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-2", "rootfs.img", b"hello world").await;

    let sha = hex::encode(Sha256::digest(b"hello world"));
    let verified_path = layout.verified_path(&sha, "rootfs.img");
    tokio::fs::create_dir_all(verified_path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&verified_path, b"hello world").await.unwrap();

    let mut cfg = config("img-2", "rootfs.img", &sha);
    cfg.signature = Some(vec![0u8; 64]);
    cfg.signing_cert_der = Some(vec![1, 2, 3]);

    let status = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await.unwrap();

    assert_eq!(status.state, ImageState::Delivered);
    assert!(!tokio::fs::try_exists(layout.verifier_path("img-2", "rootfs.img")).await.unwrap());
}

#[tokio::test]
async fn signature_present_without_cert_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-3", "rootfs.img", b"hello world").await;

    let sha = hex::encode(Sha256::digest(b"hello world"));
    let mut cfg = config("img-3", "rootfs.img", &sha);
    cfg.signature = Some(vec![0u8; 64]);

    let result = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await;
    assert!(matches!(result, Err((VerifyError::ChainVerificationFailed(_), _))));
}

#[tokio::test]
async fn signature_present_without_chain_verifier_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-4", "rootfs.img", b"hello world").await;

    let sha = hex::encode(Sha256::digest(b"hello world"));
    let mut cfg = config("img-4", "rootfs.img", &sha);
    cfg.signature = Some(vec![0u8; 64]);
    cfg.signing_cert_der = Some(vec![1, 2, 3]);

    let result = verify_image(&layout, &cfg, VerifyPolicy::default(), no_chain_verifier()).await;
    assert!(matches!(result, Err((VerifyError::ChainVerificationFailed(_), _))));
}

#[tokio::test]
async fn chain_verifier_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ImageLayout::new(dir.path(), "baseimage");
    write_pending(&layout, "img-5", "rootfs.img", b"hello world").await;

    let sha = hex::encode(Sha256::digest(b"hello world"));
    let mut cfg = config("img-5", "rootfs.img", &sha);
    cfg.signature = Some(vec![0u8; 64]);
    cfg.signing_cert_der = Some(vec![1, 2, 3]);

    let chain_verifier = TestDoubleChainVerifier { result: Err("untrusted root".to_string()) };
    let result = verify_image(&layout, &cfg, VerifyPolicy::default(), Some(&chain_verifier)).await;

    assert!(matches!(result, Err((VerifyError::ChainVerificationFailed(m), _)) if m == "untrusted root"));
}
