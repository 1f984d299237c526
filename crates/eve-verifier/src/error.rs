// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

#[derive(Debug)]
pub enum VerifyError {
    Io(std::io::Error),
    /// Computed SHA-256 didn't match the config's declared `ImageSha256`
    /// (spec §4.F step 4). Carries both for the operator-facing `LastErr`.
    ShaMismatch { computed: String, configured: String },
    ChainVerificationFailed(String),
    SignatureInvalid,
    UnsupportedAlgorithm(String),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::ShaMismatch { computed, configured } => {
                write!(f, "sha256 mismatch: computed {computed}, configured {configured}")
            }
            Self::ChainVerificationFailed(m) => write!(f, "certificate chain verification failed: {m}"),
            Self::SignatureInvalid => write!(f, "signature verification failed"),
            Self::UnsupportedAlgorithm(a) => write!(f, "unsupported signature algorithm: {a}"),
        }
    }
}

impl std::error::Error for VerifyError {}

impl From<std::io::Error> for VerifyError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
