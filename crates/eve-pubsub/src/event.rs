// SPDX-License-Identifier: BUSL-1.1

/// A single change notification delivered through `Subscription::recv`
/// (the Rust analogue of spec §4.A's `MsgChan()`), single-threaded per
/// subscription (spec §5).
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent<T> {
    Create { key: String, value: T },
    Modify { key: String, value: T },
    Delete { key: String },
    /// Publisher has completed its initial post-restart snapshot. Delivered
    /// once per publisher lifetime after the first full snapshot (spec §5).
    Restart,
    /// Initial batch has been fully delivered (spec §4.A Activate()).
    Sync,
}

impl<T> ChangeEvent<T> {
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Create { key, .. } | Self::Modify { key, .. } | Self::Delete { key } => {
                Some(key.as_str())
            }
            Self::Restart | Self::Sync => None,
        }
    }
}
