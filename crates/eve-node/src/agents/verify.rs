// SPDX-License-Identifier: BUSL-1.1

//! `verifier`'s image verification wiring for `eve-verifier::verify_image`,
//! plus the ref-count GC sweep over `PersistImageStatus` (spec §4.F
//! "Garbage collection").

use std::collections::HashMap;
use std::sync::Arc;

use eve_agent::{wait_for_global_config, Watchdog};
use eve_pubsub::Subscription;
use eve_types::{epoch_ms, ImageState, PersistImageStatus};
use eve_verifier::{gc_sweep, verify_image, ImageLayout, TestDoubleChainVerifier, VerifyPolicy};

use crate::state::NodeState;

pub fn spawn(state: Arc<NodeState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let global_sub = match Subscription::activate(&state.global_config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "verifier: failed to activate GlobalConfig subscription");
                return;
            }
        };
        let mut cfg = wait_for_global_config(&global_sub).await;

        let config_sub = match Subscription::activate(&state.verify_image_config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(err = %e, "verifier: failed to activate VerifyImageConfig subscription");
                return;
            }
        };

        state.verify_image_status.signal_restarted().await.ok();
        state.persist_image_status.signal_restarted().await.ok();

        Watchdog::new(&state.config.watchdog_dir, "verifier").spawn(state.shutdown.clone());
        let mut gc_ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.timer_gc_vdisk_s.max(1)));
        gc_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                event = global_sub.recv() => {
                    if event.is_none() {
                        break;
                    }
                    cfg = wait_for_global_config(&global_sub).await;
                }
                event = config_sub.recv() => {
                    if event.is_none() {
                        break;
                    }
                    for config in config_sub.get_all().await.into_values() {
                        let layout = ImageLayout::new(&state.config.download_root, &config.object_type);
                        // X.509 chain verification is an external collaborator
                        // out of scope for this workspace (spec §1); signed
                        // images fail cleanly with `ChainVerificationFailed`
                        // until a real `CertChainVerifier` is wired in by the
                        // deployment.
                        let result =
                            verify_image(&layout, &config, VerifyPolicy::default(), None::<&TestDoubleChainVerifier>).await;

                        let status = match result {
                            Ok(status) => status,
                            Err((e, mut status)) => {
                                tracing::warn!(image_id = %config.image_id, err = %e, "image verification failed");
                                status.last_err = e.to_string();
                                status.last_err_time_ms = epoch_ms();
                                status
                            }
                        };

                        if let Err(e) = state.verify_image_status.publish(status).await {
                            tracing::warn!(err = %e, "failed to publish VerifyImageStatus");
                        }
                    }
                    refresh_persist_image_status(&state, cfg.timer_gc_vdisk_s).await;
                }
                _ = gc_ticker.tick() => {
                    refresh_persist_image_status(&state, cfg.timer_gc_vdisk_s).await;
                }
            }
        }
    })
}

/// Recompute `PersistImageStatus.ref_count` from the currently delivered
/// `VerifyImageStatus` entries, then run the GC sweep over the merged
/// table. A sha no longer referenced by any `VerifyImageStatus` keeps its
/// entry at `ref_count=0` so the sweep can age it out (spec §4.F: "a
/// `PersistImageStatus` with `RefCount==0` for longer than
/// `DownloadGCTime` is marked `Expired=true`").
async fn refresh_persist_image_status(state: &Arc<NodeState>, download_gc_time_s: u64) {
    let now = epoch_ms();

    let mut ref_counts: HashMap<String, u32> = HashMap::new();
    for status in state.verify_image_status.get_all().await.into_values() {
        if status.state == ImageState::Delivered && !status.image_sha256.is_empty() {
            *ref_counts.entry(status.image_sha256).or_insert(0) += 1;
        }
    }

    let mut existing = state.persist_image_status.get_all().await;
    let mut table: HashMap<String, PersistImageStatus> = HashMap::new();
    for (sha, ref_count) in ref_counts {
        let mut entry = existing.remove(&sha).unwrap_or_else(|| PersistImageStatus::new(sha.clone()));
        entry.ref_count = ref_count;
        entry.last_use_ms = now;
        entry.expired = false;
        table.insert(sha, entry);
    }
    for (sha, mut entry) in existing {
        entry.ref_count = 0;
        table.insert(sha, entry);
    }

    let newly_expired = gc_sweep(&mut table, now, download_gc_time_s);
    for sha in &newly_expired {
        tracing::info!(sha256 = %sha, "image marked expired by GC sweep");
    }

    for status in table.into_values() {
        if let Err(e) = state.persist_image_status.publish(status).await {
            tracing::warn!(err = %e, "failed to publish PersistImageStatus");
        }
    }
}
