// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[test]
fn default_context_has_no_token() {
    let ctx = AttestContext::default();
    assert!(ctx.integrity_token.is_none());
    assert_eq!(ctx.iteration, 0);
}

#[test]
fn key_is_literal_attest() {
    assert_eq!(AttestContext::default().key(), "attest");
}
