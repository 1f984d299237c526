// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[test]
fn key_from_uuid_roundtrips_as_string() {
    let u = Uuid::nil();
    let k: Key = u.into();
    assert_eq!(k.as_str(), "00000000-0000-0000-0000-000000000000");
}

#[test]
fn key_serializes_transparently() {
    let k = Key::new("abc-123");
    let json = serde_json::to_string(&k).unwrap();
    assert_eq!(json, "\"abc-123\"");
    let back: Key = serde_json::from_str(&json).unwrap();
    assert_eq!(back, k);
}

#[test]
fn uuid_and_version_supersedes_same_uuid_higher_version() {
    let u = Uuid::nil();
    let old = UuidAndVersion::new(u, 1);
    let new = UuidAndVersion::new(u, 2);
    assert!(new.supersedes_or_equals(&old));
    assert!(!old.supersedes_or_equals(&new));
}

#[test]
fn uuid_and_version_does_not_supersede_different_uuid() {
    let a = UuidAndVersion::new(Uuid::nil(), 5);
    let b = UuidAndVersion::new(Uuid::from_u128(1), 5);
    assert!(!a.supersedes_or_equals(&b));
}

#[test]
fn uuid_and_version_equal_version_supersedes() {
    let u = Uuid::nil();
    let a = UuidAndVersion::new(u, 3);
    let b = UuidAndVersion::new(u, 3);
    assert!(a.supersedes_or_equals(&b));
}
