// SPDX-License-Identifier: BUSL-1.1

//! `tpmmgr`'s nonce/quote/escrow attestation wiring for `eve-attest`'s
//! `AttestFsm`.

use std::sync::Arc;

use eve_agent::Watchdog;
use eve_attest::{default_token_path, load_token, save_token, AttestFsm, AttestState, TestDoubleAttestBackend};
use eve_types::{epoch_ms, AttestContext};

use crate::state::NodeState;

pub fn spawn(state: Arc<NodeState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let token_path = default_token_path(&state.config.persist_root);
        let mut fsm = AttestFsm::new(60);
        let mut current_nonce: Option<Vec<u8>> = None;

        // A persisted integrity token from a prior boot is published
        // immediately so dependents (e.g. config-fetch's §4.E gate) don't
        // block on a fresh round-trip; the FSM still starts at `Idle` and
        // re-attests independently, replacing it once that completes.
        let persisted_token = load_token(&token_path).await;
        if persisted_token.is_some() {
            tracing::info!("loaded persisted integrity token");
        }
        publish_context(&state, current_nonce.clone(), persisted_token).await;
        state.attest_context.signal_restarted().await.ok();

        // TPM command marshalling and the controller's attestation endpoints
        // are both out of scope (spec §1); this standing double never has a
        // real TPM or controller behind it, so attestation parks at
        // `RequestNonce` until a real `TpmAgent`/`AttestControllerClient` is
        // wired in by the deployment.
        let backend = TestDoubleAttestBackend::new();

        Watchdog::new(&state.config.watchdog_dir, "tpmmgr").spawn(state.shutdown.clone());
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(5));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let now = epoch_ms();
                    if fsm.due_for_watchdog_punch(now, 60) {
                        tracing::debug!("attestation watchdog punch due");
                    }

                    if fsm.state() == AttestState::Idle {
                        current_nonce = fsm.begin();
                    }

                    let _ = fsm.drive(now, &backend, &backend).await;

                    if fsm.state() == AttestState::Attested {
                        if let Some(token) = fsm.integrity_token() {
                            if let Err(e) = save_token(&token_path, token).await {
                                tracing::warn!(err = %e, "failed to persist integrity token");
                            }
                        }
                        let sealed_vault_key = fsm.take_encrypted_vault_key().unwrap_or_default();
                        let _ = fsm.escrow(now, &sealed_vault_key, &backend).await;
                    }

                    let token = fsm.integrity_token().map(|t| t.to_vec());
                    publish_context(&state, current_nonce.clone(), token).await;
                }
            }
        }
    })
}

async fn publish_context(state: &Arc<NodeState>, nonce: Option<Vec<u8>>, integrity_token: Option<Vec<u8>>) {
    let ctx = AttestContext {
        nonce,
        internal_quote: None,
        escrow_data: None,
        iteration: 0,
        event_log: Vec::new(),
        integrity_token,
    };
    if let Err(e) = state.attest_context.publish(ctx).await {
        tracing::warn!(err = %e, "failed to publish AttestContext");
    }
}
