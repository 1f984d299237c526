// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

/// Errors surfaced by [`crate::Publication`]/[`crate::Subscription`] operations.
///
/// A persistent-backend IO failure is treated as fatal by callers per spec
/// §7 ("write failure on persistent PubSub topics... fatal; agent exits,
/// watchdog reboots the node") — this type only reports the failure, the
/// escalation to process exit is the caller's (agent scaffold's) job.
#[derive(Debug)]
pub enum PubSubError {
    /// `Unpublish` called for a key that is not currently present.
    KeyNotFound(String),
    /// Persistent backend IO failed.
    Persist(std::io::Error),
}

impl fmt::Display for PubSubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound(k) => write!(f, "key not found: {k}"),
            Self::Persist(e) => write!(f, "persistence failure: {e}"),
        }
    }
}

impl std::error::Error for PubSubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persist(e) => Some(e),
            Self::KeyNotFound(_) => None,
        }
    }
}
