// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A stable string identifier, usually a UUID string (spec §3).
///
/// Newtype over `String` rather than a bare `String` parameter so that
/// publication/subscription APIs in `eve-pubsub` cannot accidentally be
/// called with an unrelated string (e.g. a topic name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for Key {
    fn from(u: Uuid) -> Self {
        Self(u.to_string())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// UUID plus a monotonically non-decreasing version (spec §3).
///
/// Two `UuidAndVersion`s with equal `uuid` but different `version` refer to
/// the same logical entity at different configuration generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UuidAndVersion {
    pub uuid: Uuid,
    pub version: u64,
}

impl UuidAndVersion {
    pub fn new(uuid: Uuid, version: u64) -> Self {
        Self { uuid, version }
    }

    /// `true` if `other` is the same entity at a version that is not older.
    pub fn supersedes_or_equals(&self, other: &Self) -> bool {
        self.uuid == other.uuid && self.version >= other.version
    }
}

impl fmt::Display for UuidAndVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.uuid, self.version)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
