// SPDX-License-Identifier: BUSL-1.1

//! The per-image verification protocol (spec §4.F steps 1-7).

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use eve_types::{ImageState, VerifyImageConfig, VerifyImageStatus};
use sha2::{Digest, Sha256};

use crate::chain::CertChainVerifier;
use crate::error::VerifyError;
use crate::layout::ImageLayout;
use crate::sig::verify_signature;

/// Whether an empty `ImageSha256` in the config should silently adopt the
/// computed hash (spec §9 Open Question 2), rather than be a default no
/// one chose. Default matches the spec's literal described behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyPolicy {
    pub adopt_computed_hash_if_unset: bool,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self { adopt_computed_hash_if_unset: true }
    }
}

/// Run the full protocol for one image: move pending → verifier, hash,
/// optionally verify signature, move verifier → verified.
///
/// If a `verified/<sha>/<filename>` entry already exists once the hash is
/// known, this is a dedup hit against some other `ImageID` that already
/// verified the same bytes (spec §4.F step 2/6): the signature check is
/// skipped and the pending copy is discarded rather than re-verified.
///
/// On failure the partially-built status is returned alongside the error
/// rather than discarded: spec §8 scenario 4 requires a failed image keep
/// `State=Downloaded, PendingAdd=false` visible to the controller instead
/// of reverting to `Initial` as if verification had never started.
pub async fn verify_image(
    layout: &ImageLayout<'_>,
    config: &VerifyImageConfig,
    policy: VerifyPolicy,
    chain_verifier: Option<&impl CertChainVerifier>,
) -> Result<VerifyImageStatus, (VerifyError, VerifyImageStatus)> {
    let mut status = VerifyImageStatus::initial(&config.image_id);
    status.pending_add = true;
    status.state = ImageState::Downloaded;

    macro_rules! fail {
        ($e:expr) => {{
            let mut status = status.clone();
            status.pending_add = false;
            return Err(($e, status));
        }};
    }

    let pending = layout.pending_path(&config.image_id, &config.file_name);
    let verifier_dir_file = layout.verifier_path(&config.image_id, &config.file_name);

    if let Err(e) = move_and_lock_down(&pending, &verifier_dir_file).await {
        fail!(e);
    }

    let bytes = match tokio::fs::read(&verifier_dir_file).await {
        Ok(b) => b,
        Err(e) => fail!(e.into()),
    };
    let computed = hex::encode(Sha256::digest(&bytes));

    let accepted_sha = if config.image_sha256.is_empty() {
        if !policy.adopt_computed_hash_if_unset {
            fail!(VerifyError::ShaMismatch { computed, configured: String::new() });
        }
        computed.clone()
    } else if config.image_sha256.eq_ignore_ascii_case(&computed) {
        computed.clone()
    } else {
        fail!(VerifyError::ShaMismatch { computed, configured: config.image_sha256.clone() });
    };

    let verified_path = layout.verified_path(&accepted_sha, &config.file_name);
    let already_verified = tokio::fs::try_exists(&verified_path).await.unwrap_or(false);

    if !already_verified {
        if let Some(signature) = &config.signature {
            let cert_der = match config.signing_cert_der.as_ref() {
                Some(c) => c,
                None => fail!(VerifyError::ChainVerificationFailed("signature present without certificate".to_string())),
            };
            let verifier = match chain_verifier {
                Some(v) => v,
                None => fail!(VerifyError::ChainVerificationFailed("no chain verifier configured".to_string())),
            };
            let trusted_key = match verifier.verify_chain(cert_der).await {
                Ok(k) => k,
                Err(e) => fail!(e),
            };
            if let Err(e) = verify_signature(&trusted_key, &bytes, signature) {
                fail!(e);
            }
        }
        if let Err(e) = unlock_parent(&verifier_dir_file).await {
            fail!(e);
        }
        if let Err(e) = move_into_verified(&verifier_dir_file, &verified_path).await {
            fail!(e);
        }
    } else {
        if let Err(e) = unlock_parent(&verifier_dir_file).await {
            fail!(e);
        }
        if let Err(e) = tokio::fs::remove_file(&verifier_dir_file).await {
            fail!(e.into());
        }
        tracing::debug!(image_id = %config.image_id, sha256 = %accepted_sha, "dedup hit, skipping re-verification");
    }

    status.image_sha256 = accepted_sha;
    status.state = ImageState::Delivered;
    status.pending_add = false;
    Ok(status)
}

/// Move pending → verifier, then lock the file to mode `0400` and its
/// parent directory to mode `0500` (spec §4.F step 3, §6). Portable
/// `set_readonly` only clears write bits for every class (e.g. 0644→0444),
/// which doesn't match the exact modes the spec requires, so the mode is
/// set directly.
async fn move_and_lock_down(from: &Path, to: &Path) -> Result<(), VerifyError> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::rename(from, to).await?;

    tokio::fs::set_permissions(to, std::fs::Permissions::from_mode(0o400)).await?;

    if let Some(parent) = to.parent() {
        tokio::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o500)).await?;
    }
    Ok(())
}

/// Restore write permission on `path`'s parent directory so the final
/// verifier→verified move (which unlinks the entry from that directory)
/// can proceed; the file itself stays at mode `0400`.
async fn unlock_parent(path: &Path) -> Result<(), VerifyError> {
    if let Some(parent) = path.parent() {
        tokio::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700)).await?;
    }
    Ok(())
}

/// Move verifier → verified (spec §4.F step 6).
async fn move_into_verified(from: &Path, to: &Path) -> Result<(), VerifyError> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::rename(from, to).await?;
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
