// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use eve_types::Publishable;

use crate::backend::Backend;
use crate::error::PubSubError;
use crate::event::ChangeEvent;
use crate::identity::TopicIdentity;
use crate::shared::Shared;

/// A publisher's exclusive handle on a topic (spec §3, §4.A).
///
/// The publisher exclusively owns the published value; every read a
/// subscriber performs is a deep copy (`T: Clone`), so mutating a value
/// obtained from `Get`/`GetAll` never affects the publisher's copy.
pub struct Publication<T: Publishable + 'static> {
    pub(crate) shared: Arc<Shared<T>>,
}

impl<T: Publishable + 'static> Publication<T> {
    /// Create a new, empty, non-persistent publication.
    pub fn new(identity: TopicIdentity) -> Self {
        Self { shared: Arc::new(Shared::new(identity, Backend::Memory)) }
    }

    /// Create a new, empty publication backed by on-disk persistence under
    /// `persist_root` (spec §4.A invariant I2: "a persistent publication
    /// survives process restart, with content loaded before any subscriber
    /// observes it" — enforced here because nothing is loaded into `items`
    /// until a subscriber activates, at which point `Backend::load_all` is
    /// read straight from disk rather than from `items`).
    pub fn new_persistent(identity: TopicIdentity, persist_root: std::path::PathBuf) -> Self {
        Self { shared: Arc::new(Shared::new(identity, Backend::File { persist_root })) }
    }

    pub fn is_persistent(&self) -> bool {
        self.shared.backend.is_persistent()
    }

    /// Replace or insert `key`. Returns `Ok(())` without notifying
    /// subscribers if `item` is structurally equal to the stored value
    /// (spec §8 invariant 1).
    pub async fn publish(&self, item: T) -> Result<(), PubSubError> {
        let key = item.key();
        let mut items = self.shared.items.write().await;
        let prev = items.get(&key).cloned();
        if prev.as_ref() == Some(&item) {
            return Ok(());
        }

        if self.shared.backend.is_persistent() {
            self.shared
                .backend
                .save(&self.shared.identity, &key, &item)
                .await
                .map_err(PubSubError::Persist)?;
        }

        let is_new = prev.is_none();
        items.insert(key.clone(), item.clone());
        drop(items);

        match &prev {
            Some(p) => item.log_modify(p),
            None => item.log_create(),
        }

        let event = if is_new {
            ChangeEvent::Create { key, value: item }
        } else {
            ChangeEvent::Modify { key, value: item }
        };
        self.shared.notify(event).await;
        Ok(())
    }

    /// Remove `key`. Fails when the key is absent (spec §4.A).
    pub async fn unpublish(&self, key: &str) -> Result<(), PubSubError> {
        let mut items = self.shared.items.write().await;
        let removed = items.remove(key);
        drop(items);

        let Some(removed) = removed else {
            return Err(PubSubError::KeyNotFound(key.to_string()));
        };

        if self.shared.backend.is_persistent() {
            self.shared
                .backend
                .delete(&self.shared.identity, key)
                .await
                .map_err(PubSubError::Persist)?;
        }

        removed.log_delete();
        self.shared.notify(ChangeEvent::Delete { key: key.to_string() }).await;
        Ok(())
    }

    /// Set the restart barrier: persist it (for persistent topics) and
    /// deliver `Restart` to every currently-active subscriber.
    pub async fn signal_restarted(&self) -> Result<(), PubSubError> {
        *self.shared.restarted.write().await = true;
        if self.shared.backend.is_persistent() {
            self.shared
                .backend
                .write_restart_barrier(&self.shared.identity)
                .await
                .map_err(PubSubError::Persist)?;
        }
        self.shared.notify(ChangeEvent::Restart).await;
        Ok(())
    }

    pub async fn clear_restarted(&self) -> Result<(), PubSubError> {
        *self.shared.restarted.write().await = false;
        if self.shared.backend.is_persistent() {
            self.shared
                .backend
                .clear_restart_barrier(&self.shared.identity)
                .await
                .map_err(PubSubError::Persist)?;
        }
        Ok(())
    }

    pub async fn restarted(&self) -> bool {
        *self.shared.restarted.read().await
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.shared.items.read().await.get(key).cloned()
    }

    pub async fn get_all(&self) -> std::collections::HashMap<String, T> {
        self.shared.items.read().await.clone()
    }

    /// Call `f` for every currently-published item.
    pub async fn iterate(&self, mut f: impl FnMut(&str, &T)) {
        for (k, v) in self.shared.items.read().await.iter() {
            f(k, v);
        }
    }

    /// Unpublish every key, clear the restart barrier, and drop all
    /// subscriber channels (spec §4.A `Close()`).
    pub async fn close(&self) -> Result<(), PubSubError> {
        let keys: Vec<String> = self.shared.items.read().await.keys().cloned().collect();
        for key in keys {
            self.unpublish(&key).await?;
        }
        self.clear_restarted().await?;
        self.shared.subscribers.write().await.clear();
        Ok(())
    }
}

impl<T: Publishable + 'static> Clone for Publication<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

#[cfg(test)]
#[path = "publication_tests.rs"]
mod tests;
