// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use crate::Publishable;

/// Lifecycle state of an image artifact (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageState {
    Initial,
    Downloaded,
    Delivered,
}

/// Controller-supplied configuration for a single image to verify (spec §3, §4.F).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyImageConfig {
    pub image_id: String,
    /// Configured SHA-256, compared case-insensitively; empty means
    /// "adopt the computed hash" (spec §9 Open Question 2, see
    /// `eve-verifier::VerifyPolicy`).
    pub image_sha256: String,
    pub object_type: String,
    pub file_name: String,
    /// DER-encoded signing certificate, if the image is signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_cert_der: Option<Vec<u8>>,
    /// Raw signature bytes over the SHA-256 digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<u8>>,
}

impl Publishable for VerifyImageConfig {
    fn key(&self) -> String {
        self.image_id.clone()
    }

    fn topic_name() -> &'static str {
        "VerifyImageConfig"
    }
}

/// Status of a single `ImageID`'s verification (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyImageStatus {
    pub image_id: String,
    pub image_sha256: String,
    pub state: ImageState,
    pub pending_add: bool,
    pub last_err: String,
    pub last_err_time_ms: u64,
}

impl VerifyImageStatus {
    pub fn initial(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            image_sha256: String::new(),
            state: ImageState::Initial,
            pending_add: false,
            last_err: String::new(),
            last_err_time_ms: 0,
        }
    }
}

impl Publishable for VerifyImageStatus {
    fn key(&self) -> String {
        self.image_id.clone()
    }

    fn topic_name() -> &'static str {
        "VerifyImageStatus"
    }
}

/// Ref-counted status keyed by content hash, enabling dedup across
/// `ImageID`s that resolve to the same bytes (spec §3, §4.F step 6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistImageStatus {
    pub sha256: String,
    pub ref_count: u32,
    /// Millis since epoch this image was last referenced; used for GC.
    pub last_use_ms: u64,
    pub expired: bool,
}

impl PersistImageStatus {
    pub fn new(sha256: impl Into<String>) -> Self {
        Self { sha256: sha256.into(), ref_count: 0, last_use_ms: 0, expired: false }
    }

    /// §4.F GC: `RefCount==0` for longer than `download_gc_time_s` marks
    /// `Expired=true`.
    pub fn gc_tick(&mut self, now_ms: u64, download_gc_time_s: u64) {
        if self.ref_count == 0 && now_ms.saturating_sub(self.last_use_ms) > download_gc_time_s * 1000 {
            self.expired = true;
        }
    }
}

impl Publishable for PersistImageStatus {
    fn key(&self) -> String {
        self.sha256.clone()
    }

    fn topic_name() -> &'static str {
        "PersistImageStatus"
    }
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
