// SPDX-License-Identifier: BUSL-1.1

//! Certificate chain verification up to the node's root CA is an external
//! collaborator: no X.509 parsing crate is part of this workspace's
//! dependency stack, so building and walking the chain is delegated through
//! a narrow trait, the same pattern used for the TPM agent and controller
//! clients elsewhere in this repository. This crate verifies only the raw
//! signature over the image digest once it has a trusted public key.

use std::future::Future;
use std::pin::Pin;

use crate::error::VerifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    RsaPkcs1Sha256,
    EcdsaP256,
}

/// The trusted public key extracted from a leaf certificate whose chain has
/// already been verified up to the node's root CA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedPublicKey {
    pub algorithm: SignatureAlgorithm,
    /// Key bytes in the encoding `ring::signature::UnparsedPublicKey`
    /// expects for `algorithm`: an ASN.1 `RSAPublicKey` DER structure for
    /// `RsaPkcs1Sha256`, or an uncompressed SEC1 point (`0x04 || X || Y`)
    /// for `EcdsaP256`.
    pub key_bytes: Vec<u8>,
}

pub trait CertChainVerifier: Send + Sync {
    /// Validate that `leaf_cert_der` chains up to the node's root CA and
    /// return its public key material. An `Err` here corresponds to
    /// spec §4.F step 5 ("verify chain") failing before any signature math
    /// is attempted.
    fn verify_chain<'a>(
        &'a self,
        leaf_cert_der: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<TrustedPublicKey, VerifyError>> + Send + 'a>>;
}

/// Test double that trusts any certificate and returns a fixed key.
pub struct TestDoubleChainVerifier {
    pub result: Result<TrustedPublicKey, String>,
}

impl CertChainVerifier for TestDoubleChainVerifier {
    fn verify_chain<'a>(
        &'a self,
        _leaf_cert_der: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<TrustedPublicKey, VerifyError>> + Send + 'a>> {
        let result = match &self.result {
            Ok(key) => Ok(key.clone()),
            Err(msg) => Err(VerifyError::ChainVerificationFailed(msg.clone())),
        };
        Box::pin(async move { result })
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
