// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eve_types::Publishable;
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::event::ChangeEvent;
#[cfg(test)]
use crate::identity::TopicIdentity;
use crate::publication::Publication;
use crate::shared::Shared;

/// A subscriber's mirror of a topic (spec §3, §4.A).
///
/// Events are delivered single-threaded per subscription (spec §5): the
/// owning agent calls [`Subscription::recv`] from its one event loop, and
/// only that call site ever mutates the mirror.
pub struct Subscription<T: Publishable + 'static> {
    shared: Arc<Shared<T>>,
    mirror: RwLock<HashMap<String, T>>,
    rx: Mutex<mpsc::UnboundedReceiver<ChangeEvent<T>>>,
    restarted: AtomicBool,
    synchronized: AtomicBool,
}

impl<T: Publishable + 'static> Subscription<T> {
    /// Open the stream against `publication`. For a persistent publication,
    /// pre-loads disk contents and enqueues a `Modify` for each key before
    /// returning, so the first events `recv()` yields are a stable initial
    /// snapshot followed by `Sync` and (if the barrier is set) `Restart`
    /// (spec §4.A Activate(), load order 1-2-3).
    pub async fn activate(publication: &Publication<T>) -> std::io::Result<Self> {
        let shared = Arc::clone(&publication.shared);
        let (tx, rx) = mpsc::unbounded_channel();

        let mut mirror = HashMap::new();

        if shared.backend.is_persistent() {
            for (key, value) in shared.backend.load_all::<T>(&shared.identity).await? {
                mirror.insert(key.clone(), value.clone());
                let _ = tx.send(ChangeEvent::Modify { key, value });
            }
        } else {
            for (key, value) in shared.items.read().await.iter() {
                mirror.insert(key.clone(), value.clone());
                let _ = tx.send(ChangeEvent::Modify { key: key.clone(), value: value.clone() });
            }
        }

        let _ = tx.send(ChangeEvent::Sync);

        let restart_seen = if shared.backend.is_persistent() {
            shared.backend.has_restart_barrier(&shared.identity).await
        } else {
            *shared.restarted.read().await
        };
        if restart_seen {
            let _ = tx.send(ChangeEvent::Restart);
        }

        // Register for live updates only after the initial batch is queued,
        // so a publish racing with activation cannot be observed twice or
        // interleaved ahead of the snapshot.
        shared.subscribers.write().await.push(tx);

        // The mirror and these flags reflect the state as of activation
        // (spec §4.A: Activate() "pre-loads... before returning, ensuring
        // handlers see a stable initial snapshot with restart/sync
        // markers"); `recv()` still replays the same information as
        // discrete events for a consumer that dispatches per-event instead
        // of polling the mirror.
        Ok(Self {
            shared,
            mirror: RwLock::new(mirror),
            rx: Mutex::new(rx),
            restarted: AtomicBool::new(restart_seen),
            synchronized: AtomicBool::new(true),
        })
    }

    /// Receive and apply the next change notification (the Rust analogue of
    /// spec §4.A's `MsgChan()`). Updates the mirror, then returns the event
    /// to the caller for dispatch to its own handler. Returns `None` once
    /// the publisher has dropped all subscriber channels.
    pub async fn recv(&self) -> Option<ChangeEvent<T>> {
        let event = self.rx.lock().await.recv().await?;
        match &event {
            ChangeEvent::Create { key, value } | ChangeEvent::Modify { key, value } => {
                self.mirror.write().await.insert(key.clone(), value.clone());
            }
            ChangeEvent::Delete { key } => {
                self.mirror.write().await.remove(key);
            }
            ChangeEvent::Sync => self.synchronized.store(true, Ordering::Relaxed),
            ChangeEvent::Restart => self.restarted.store(true, Ordering::Relaxed),
        }
        Some(event)
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.mirror.read().await.get(key).cloned()
    }

    pub async fn get_all(&self) -> HashMap<String, T> {
        self.mirror.read().await.clone()
    }

    pub async fn iterate(&self, mut f: impl FnMut(&str, &T)) {
        for (k, v) in self.mirror.read().await.iter() {
            f(k, v);
        }
    }

    /// `true` once at least one `Restart` has been observed from the publisher.
    pub fn restarted(&self) -> bool {
        self.restarted.load(Ordering::Relaxed)
    }

    /// `true` once the initial batch has been fully delivered.
    pub fn synchronized(&self) -> bool {
        self.synchronized.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
