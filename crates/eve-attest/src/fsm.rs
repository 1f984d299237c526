// SPDX-License-Identifier: BUSL-1.1

//! Attestation FSM (spec §4.E): `Idle → RequestNonce → HaveNonce →
//! RequestQuote → HaveQuote → Attested → Escrow → Complete`, with a
//! `Restart` edge back to `Idle` and per-error retry edges.
//!
//! Mapping decision (spec doesn't spell out which side originates each
//! verb): `RequestNonce` covers generating and publishing the nonce while
//! waiting on the TPM agent's `AttestQuote`; `HaveNonce` is reached once
//! that quote arrives and its nonce is checked; `RequestQuote` is
//! submitting it to the controller; `HaveQuote` holds the controller's ack.

use rand::RngCore;

use crate::collaborators::{AttestControllerClient, QuoteAck, TpmAgent, TpmQuote};
use crate::error::AttestError;

const NONCE_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestState {
    Idle,
    RequestNonce,
    HaveNonce,
    RequestQuote,
    HaveQuote,
    Attested,
    Escrow,
    Complete,
}

pub struct AttestFsm {
    state: AttestState,
    nonce: Option<Vec<u8>>,
    quote: Option<TpmQuote>,
    integrity_token: Option<Vec<u8>>,
    encrypted_vault_key: Option<Vec<u8>>,
    iteration: u32,
    retry_interval_s: u64,
    retry_due_ms: Option<u64>,
    last_watchdog_punch_ms: u64,
}

impl AttestFsm {
    pub fn new(retry_interval_s: u64) -> Self {
        Self {
            state: AttestState::Idle,
            nonce: None,
            quote: None,
            integrity_token: None,
            encrypted_vault_key: None,
            iteration: 0,
            retry_interval_s,
            retry_due_ms: None,
            last_watchdog_punch_ms: 0,
        }
    }

    pub fn state(&self) -> AttestState {
        self.state
    }

    pub fn integrity_token(&self) -> Option<&[u8]> {
        self.integrity_token.as_deref()
    }

    pub fn has_valid_integrity_token(&self) -> bool {
        self.integrity_token.is_some() && matches!(self.state, AttestState::Attested | AttestState::Escrow | AttestState::Complete)
    }

    /// Parallel `Restart` edge: returns to `Idle` from any state, clearing
    /// everything but the iteration counter.
    pub fn restart(&mut self) {
        self.state = AttestState::Idle;
        self.nonce = None;
        self.quote = None;
        self.integrity_token = None;
        self.encrypted_vault_key = None;
        self.retry_due_ms = None;
        tracing::info!("attestation FSM restarted");
    }

    /// An HTTP 403 from the controller forces the FSM back to `Idle`
    /// (spec §4.E config-fetch interaction).
    pub fn on_forbidden(&mut self) {
        tracing::warn!("controller returned 403; invalidating integrity token and restarting attestation");
        self.restart();
    }

    /// `Idle → RequestNonce`: generate and record a fresh nonce. Publishing
    /// it on the `AttestNonce` topic is the caller's job (it owns the
    /// `Publication` handle); this just produces the bytes to publish.
    pub fn begin(&mut self) -> Option<Vec<u8>> {
        if self.state != AttestState::Idle {
            return None;
        }
        let mut nonce = vec![0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        self.nonce = Some(nonce.clone());
        self.state = AttestState::RequestNonce;
        Some(nonce)
    }

    fn due_for_retry(&self, now_ms: u64) -> bool {
        self.retry_due_ms.map(|due| now_ms >= due).unwrap_or(true)
    }

    fn schedule_retry(&mut self, now_ms: u64, err: AttestError) {
        self.retry_due_ms = Some(now_ms + self.retry_interval_s * 1000);
        self.iteration = self.iteration.wrapping_add(1);
        tracing::warn!(err = %err, iteration = self.iteration, "attestation step failed, will retry");
    }

    /// Each error variant bounces the FSM back to a different state
    /// (`error.rs`'s own doc comment). `NonceMismatch`/`ITokenMismatch` mean
    /// the in-flight nonce or token is no longer trustworthy, so the FSM
    /// restarts at `Idle` to request a fresh nonce rather than resume
    /// mid-protocol; the remaining variants (`QuoteMismatch`, `NoCertYet`,
    /// `ControllerReqFailed`) retry in place since the in-flight material is
    /// still valid to resubmit.
    fn handle_step_error(&mut self, now_ms: u64, err: AttestError) {
        if matches!(err, AttestError::NonceMismatch | AttestError::ITokenMismatch) {
            self.state = AttestState::Idle;
            self.nonce = None;
            self.quote = None;
            self.integrity_token = None;
        }
        self.schedule_retry(now_ms, err);
    }

    /// `RequestNonce → HaveNonce → RequestQuote → HaveQuote`: ask the TPM
    /// agent for a quote over our nonce, check it, then submit it to the
    /// controller. Collapsed into one step since both legs are
    /// collaborator round-trips with the same retry treatment.
    pub async fn drive(
        &mut self,
        now_ms: u64,
        tpm: &impl TpmAgent,
        controller: &impl AttestControllerClient,
    ) -> Result<(), AttestError> {
        if !self.due_for_retry(now_ms) {
            return Ok(());
        }

        match self.state {
            AttestState::RequestNonce => {
                let nonce = self.nonce.clone().unwrap_or_default();
                match tpm.quote(&nonce).await {
                    Ok(quote) => {
                        self.quote = Some(quote);
                        self.state = AttestState::HaveNonce;
                        self.retry_due_ms = None;
                        Ok(())
                    }
                    Err(e) => {
                        self.handle_step_error(now_ms, e.clone());
                        Err(e)
                    }
                }
            }
            AttestState::HaveNonce => {
                self.state = AttestState::RequestQuote;
                self.retry_due_ms = None;
                Ok(())
            }
            AttestState::RequestQuote => {
                let quote = match &self.quote {
                    Some(q) => q.clone(),
                    None => return Err(AttestError::QuoteMismatch),
                };
                match controller.submit_quote(&quote).await {
                    Ok(QuoteAck { integrity_token, encrypted_vault_key }) => {
                        self.integrity_token = Some(integrity_token);
                        self.encrypted_vault_key = encrypted_vault_key;
                        self.state = AttestState::HaveQuote;
                        self.retry_due_ms = None;
                        Ok(())
                    }
                    Err(e) => {
                        self.handle_step_error(now_ms, e.clone());
                        Err(e)
                    }
                }
            }
            AttestState::HaveQuote => {
                self.state = AttestState::Attested;
                self.retry_due_ms = None;
                tracing::info!("attestation complete, integrity token acquired");
                Ok(())
            }
            AttestState::Attested | AttestState::Escrow | AttestState::Complete | AttestState::Idle => Ok(()),
        }
    }

    /// Any encrypted vault key the controller handed back alongside the
    /// integrity token (spec §4.E: "publish the latter as
    /// `EncryptedVaultKeyFromController`" — publishing is the caller's job).
    pub fn take_encrypted_vault_key(&mut self) -> Option<Vec<u8>> {
        self.encrypted_vault_key.take()
    }

    /// `Attested → Escrow → Complete`: ship the sealed vault key blob,
    /// tagged with the current integrity token.
    pub async fn escrow(
        &mut self,
        now_ms: u64,
        sealed_vault_key: &[u8],
        controller: &impl AttestControllerClient,
    ) -> Result<(), AttestError> {
        if self.state != AttestState::Attested {
            return Ok(());
        }
        if !self.due_for_retry(now_ms) {
            return Ok(());
        }
        self.state = AttestState::Escrow;
        let token = self.integrity_token.clone().unwrap_or_default();
        match controller.escrow(&token, sealed_vault_key).await {
            Ok(()) => {
                self.state = AttestState::Complete;
                self.retry_due_ms = None;
                Ok(())
            }
            Err(e) => {
                self.state = AttestState::Attested;
                self.schedule_retry(now_ms, e.clone());
                Err(e)
            }
        }
    }

    /// Watchdog-punch edge: fires every `watchdogInterval` from any state
    /// (spec §4.E). Returns `true` when the caller should touch the
    /// watchdog file now.
    pub fn due_for_watchdog_punch(&mut self, now_ms: u64, watchdog_interval_s: u64) -> bool {
        if now_ms.saturating_sub(self.last_watchdog_punch_ms) >= watchdog_interval_s * 1000 {
            self.last_watchdog_punch_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "fsm_tests.rs"]
mod tests;
