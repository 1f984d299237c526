// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

/// Errors that can interrupt the attestation FSM (spec §4.E). Each defines
/// its own retry edge — `retry_after` is always `retryTimeInterval`
/// (~15s), but they're kept as distinct variants since the state they
/// bounce the FSM back to differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestError {
    /// The quote's nonce didn't match the one we published.
    NonceMismatch,
    /// The controller rejected the quote as not matching expected PCRs.
    QuoteMismatch,
    /// No signing certificate is available yet for this device.
    NoCertYet,
    /// The controller request itself failed (network, non-2xx).
    ControllerReqFailed(String),
    /// The stored integrity token didn't match what the controller expected.
    ITokenMismatch,
}

impl fmt::Display for AttestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonceMismatch => write!(f, "nonce mismatch"),
            Self::QuoteMismatch => write!(f, "quote mismatch"),
            Self::NoCertYet => write!(f, "no signing certificate yet"),
            Self::ControllerReqFailed(m) => write!(f, "controller request failed: {m}"),
            Self::ITokenMismatch => write!(f, "integrity token mismatch"),
        }
    }
}

impl std::error::Error for AttestError {}
