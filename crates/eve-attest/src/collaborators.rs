// SPDX-License-Identifier: BUSL-1.1

//! External collaborators the attestation FSM reaches through: the TPM
//! command marshalling and the controller's attestation endpoints are both
//! out of scope (spec §1), so they're represented as narrow traits.

use std::future::Future;
use std::pin::Pin;

use crate::error::AttestError;

/// A signed PCR quote plus an optional boot event log, as produced by the
/// on-device TPM agent observing the published nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpmQuote {
    pub quote: Vec<u8>,
    pub event_log: Vec<String>,
}

pub trait TpmAgent: Send + Sync {
    fn quote<'a>(
        &'a self,
        nonce: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<TpmQuote, AttestError>> + Send + 'a>>;
}

/// What the controller hands back on a successful quote submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteAck {
    pub integrity_token: Vec<u8>,
    pub encrypted_vault_key: Option<Vec<u8>>,
}

pub trait AttestControllerClient: Send + Sync {
    /// Submit the quote, PCR values, and version info; returns the opaque
    /// integrity token and any controller-encrypted vault key (spec §4.E
    /// `RequestQuote` responsibility).
    fn submit_quote<'a>(
        &'a self,
        quote: &'a TpmQuote,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteAck, AttestError>> + Send + 'a>>;

    /// Ship the locally-sealed vault key blob to the controller for backup,
    /// tagged with the current integrity token (spec §4.E `Escrow`).
    fn escrow<'a>(
        &'a self,
        integrity_token: &'a [u8],
        sealed_vault_key: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<(), AttestError>> + Send + 'a>>;
}

/// Scripted test double for both collaborators, useful for driving the FSM
/// through a deterministic sequence in tests.
pub struct TestDoubleAttestBackend {
    pub quotes: std::sync::Mutex<std::collections::VecDeque<Result<TpmQuote, AttestError>>>,
    pub acks: std::sync::Mutex<std::collections::VecDeque<Result<QuoteAck, AttestError>>>,
    pub escrow_results: std::sync::Mutex<std::collections::VecDeque<Result<(), AttestError>>>,
}

impl TestDoubleAttestBackend {
    pub fn new() -> Self {
        Self {
            quotes: std::sync::Mutex::new(std::collections::VecDeque::new()),
            acks: std::sync::Mutex::new(std::collections::VecDeque::new()),
            escrow_results: std::sync::Mutex::new(std::collections::VecDeque::new()),
        }
    }

    pub fn push_quote(&self, result: Result<TpmQuote, AttestError>) {
        self.quotes.lock().unwrap_or_else(|p| p.into_inner()).push_back(result);
    }

    pub fn push_ack(&self, result: Result<QuoteAck, AttestError>) {
        self.acks.lock().unwrap_or_else(|p| p.into_inner()).push_back(result);
    }

    pub fn push_escrow(&self, result: Result<(), AttestError>) {
        self.escrow_results.lock().unwrap_or_else(|p| p.into_inner()).push_back(result);
    }
}

impl Default for TestDoubleAttestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TpmAgent for TestDoubleAttestBackend {
    fn quote<'a>(
        &'a self,
        _nonce: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<TpmQuote, AttestError>> + Send + 'a>> {
        let next = self
            .quotes
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or(Err(AttestError::NoCertYet));
        Box::pin(async move { next })
    }
}

impl AttestControllerClient for TestDoubleAttestBackend {
    fn submit_quote<'a>(
        &'a self,
        _quote: &'a TpmQuote,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteAck, AttestError>> + Send + 'a>> {
        let next = self
            .acks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or(Err(AttestError::ControllerReqFailed("test double exhausted".to_string())));
        Box::pin(async move { next })
    }

    fn escrow<'a>(
        &'a self,
        _integrity_token: &'a [u8],
        _sealed_vault_key: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<(), AttestError>> + Send + 'a>> {
        let next = self
            .escrow_results
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or(Err(AttestError::ControllerReqFailed("test double exhausted".to_string())));
        Box::pin(async move { next })
    }
}

#[cfg(test)]
#[path = "collaborators_tests.rs"]
mod tests;
