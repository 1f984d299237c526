// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[test]
fn initial_status_has_initial_state() {
    let s = VerifyImageStatus::initial("img-1");
    assert_eq!(s.state, ImageState::Initial);
    assert!(!s.pending_add);
    assert_eq!(s.last_err, "");
}

#[test]
fn gc_tick_expires_after_grace_period_with_zero_refcount() {
    let mut p = PersistImageStatus::new("abc");
    p.last_use_ms = 0;
    p.ref_count = 0;
    p.gc_tick(601_000, 600);
    assert!(p.expired);
}

#[test]
fn gc_tick_does_not_expire_within_grace_period() {
    let mut p = PersistImageStatus::new("abc");
    p.last_use_ms = 0;
    p.ref_count = 0;
    p.gc_tick(599_000, 600);
    assert!(!p.expired);
}

#[test]
fn gc_tick_never_expires_while_referenced() {
    let mut p = PersistImageStatus::new("abc");
    p.ref_count = 1;
    p.gc_tick(10_000_000, 600);
    assert!(!p.expired);
}

#[test]
fn keys_match_spec_identities() {
    let cfg = VerifyImageConfig {
        image_id: "img-1".into(),
        image_sha256: String::new(),
        object_type: "app".into(),
        file_name: "img.bin".into(),
        signing_cert_der: None,
        signature: None,
    };
    assert_eq!(cfg.key(), "img-1");
    let persist = PersistImageStatus::new("deadbeef");
    assert_eq!(persist.key(), "deadbeef");
}
