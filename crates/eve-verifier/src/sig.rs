// SPDX-License-Identifier: BUSL-1.1

//! Raw signature verification over an image's content (spec §4.F step 5).
//! Supports RSA-PKCS1v15-SHA256 and ECDSA-P256 with a raw `r||s` (64-byte)
//! signature encoding.
//!
//! `ring`'s `signature::UnparsedPublicKey::verify` hashes whatever bytes
//! it's given exactly once before comparing against the signature. The
//! caller must pass the image's raw content here, not an already-computed
//! SHA-256 digest of it — passing a digest would make `ring` hash it a
//! second time, rejecting every signature a real controller produces over
//! a single SHA-256 pass.

use ring::signature::{self, UnparsedPublicKey};

use crate::chain::{SignatureAlgorithm, TrustedPublicKey};
use crate::error::VerifyError;

pub fn verify_signature(key: &TrustedPublicKey, message: &[u8], signature_bytes: &[u8]) -> Result<(), VerifyError> {
    match key.algorithm {
        SignatureAlgorithm::RsaPkcs1Sha256 => {
            let public_key = UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, &key.key_bytes);
            public_key.verify(message, signature_bytes).map_err(|_| VerifyError::SignatureInvalid)
        }
        SignatureAlgorithm::EcdsaP256 => {
            if signature_bytes.len() != 64 {
                return Err(VerifyError::UnsupportedAlgorithm(format!(
                    "ECDSA-P256 signature must be raw r||s (64 bytes), got {}",
                    signature_bytes.len()
                )));
            }
            let public_key = UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_FIXED, &key.key_bytes);
            public_key.verify(message, signature_bytes).map_err(|_| VerifyError::SignatureInvalid)
        }
    }
}

#[cfg(test)]
#[path = "sig_tests.rs"]
mod tests;
