// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[test]
fn same_bytes_hash_identically() {
    assert_eq!(config_hash(b"hello"), config_hash(b"hello"));
}

#[test]
fn different_bytes_hash_differently() {
    assert_ne!(config_hash(b"hello"), config_hash(b"world"));
}

#[test]
fn hash_is_hex_sha256_length() {
    let h = config_hash(b"anything");
    assert_eq!(h.len(), 64);
    assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
}
