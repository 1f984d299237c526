// SPDX-License-Identifier: BUSL-1.1

//! Shared data model for the EVE on-device coordination substrate.
//!
//! Every type here is a plain value type: consumers of [`eve_pubsub`] read
//! deep copies, so nothing in this crate holds interior mutability or
//! non-`Clone` handles. See `SPEC_FULL.md` §3 for the full data model.

pub mod attest;
pub mod dpc;
pub mod global_config;
pub mod key;
pub mod node_agent;
pub mod verify;
pub mod zboot;

pub use attest::AttestContext;
pub use dpc::{DevicePortConfig, DevicePortConfigList, ModemState, PortConfig, PortKind};
pub use global_config::GlobalConfig;
pub use key::{Key, UuidAndVersion};
pub use node_agent::NodeAgentStatus;
pub use verify::{ImageState, PersistImageStatus, VerifyImageConfig, VerifyImageStatus};
pub use zboot::{PartitionState, ZbootStatus};

/// Capability set every published type must expose (spec §3).
///
/// `Key` gives the publication its map key; the `Log*` methods are called by
/// [`eve_pubsub`] purely for structured tracing, never for control flow.
pub trait Publishable: Clone + PartialEq + serde::Serialize + serde::de::DeserializeOwned {
    /// Stable string identifier for this value within its topic.
    fn key(&self) -> String;

    /// Canonical topic name for `Self`. Declared once per type, not per call,
    /// per the design note in spec §9 ("a generic publication parameter...
    /// eliminating runtime type checks at publish time").
    fn topic_name() -> &'static str;

    /// Called by the bus when a key is first created.
    fn log_create(&self) {}

    /// Called by the bus when a key is modified, given the previous value.
    fn log_modify(&self, _prev: &Self) {}

    /// Called by the bus when a key is removed.
    fn log_delete(&self) {}
}

/// Current epoch-millis timestamp. Timestamp fields throughout this crate
/// are plain `u64` millis stamped by callers at the point of observation.
pub fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
