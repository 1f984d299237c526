// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;

use eve_types::Publishable;
use tokio::sync::{mpsc, RwLock};

use crate::backend::Backend;
use crate::event::ChangeEvent;
use crate::identity::TopicIdentity;

/// State shared between a [`crate::Publication`] and every
/// [`crate::Subscription`] activated against it.
///
/// This is the in-process analogue of the real EVE's inter-process topic:
/// spec §1 calls PubSub "the sole inter-agent coupling mechanism" and §5
/// notes concurrency is coordinated exclusively through it, never through
/// shared in-process memory — here that boundary is this one struct, never
/// reached around.
pub(crate) struct Shared<T: Publishable> {
    pub(crate) identity: TopicIdentity,
    pub(crate) items: RwLock<HashMap<String, T>>,
    pub(crate) restarted: RwLock<bool>,
    pub(crate) backend: Backend,
    pub(crate) subscribers: RwLock<Vec<mpsc::UnboundedSender<ChangeEvent<T>>>>,
}

impl<T: Publishable + 'static> Shared<T> {
    pub(crate) fn new(identity: TopicIdentity, backend: Backend) -> Self {
        assert_eq!(
            T::topic_name(),
            identity.topic_name,
            "topic identity must match the canonical name of T (spec §3 invariant I1)"
        );
        Self {
            identity,
            items: RwLock::new(HashMap::new()),
            restarted: RwLock::new(false),
            backend,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Fan out `event` to every live subscriber channel, dropping any whose
    /// receiver has gone away.
    pub(crate) async fn notify(&self, event: ChangeEvent<T>) {
        let mut subs = self.subscribers.write().await;
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
