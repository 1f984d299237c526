// SPDX-License-Identifier: BUSL-1.1

//! Persistence backend for a topic. Non-persistent topics use [`Backend::Memory`]
//! (a no-op); persistent topics use [`Backend::File`], which stores one
//! self-describing JSON record per key under the topic directory (spec
//! §4.A/§6) plus a `.restarted` sentinel encoding the restart barrier.
//!
//! Each method takes a generic `T: Publishable`, so this is a plain enum
//! rather than a trait object — a dyn-safe persistence trait would need
//! type erasure per call, which is exactly the per-call runtime dispatch
//! spec §9 says to avoid.

use std::path::{Path, PathBuf};

use eve_types::Publishable;

use crate::identity::TopicIdentity;

#[derive(Debug, Clone)]
pub enum Backend {
    Memory,
    File { persist_root: PathBuf },
}

impl Backend {
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Load every on-disk record for this topic. A malformed record is
    /// logged and skipped, per spec §4.A failure semantics.
    pub async fn load_all<T: Publishable + 'static>(
        &self,
        identity: &TopicIdentity,
    ) -> std::io::Result<Vec<(String, T)>> {
        let Self::File { persist_root } = self else {
            return Ok(Vec::new());
        };
        let dir = identity.topic_dir(persist_root);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut loaded = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let key = match path.file_stem().and_then(|s| s.to_str()) {
                Some(k) => k.to_string(),
                None => continue,
            };
            match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<T>(&bytes) {
                    Ok(value) => loaded.push((key, value)),
                    Err(e) => {
                        tracing::warn!(
                            topic = identity.topic_name,
                            key = %key,
                            err = %e,
                            "skipping malformed persisted record"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(topic = identity.topic_name, key = %key, err = %e, "failed to read persisted record");
                }
            }
        }
        Ok(loaded)
    }

    /// Atomic per-key write: write-tempfile then rename (spec §4.A, §5).
    pub async fn save<T: Publishable + 'static>(
        &self,
        identity: &TopicIdentity,
        key: &str,
        item: &T,
    ) -> std::io::Result<()> {
        let Self::File { persist_root } = self else {
            return Ok(());
        };
        let dir = identity.topic_dir(persist_root);
        tokio::fs::create_dir_all(&dir).await?;
        let final_path = dir.join(format!("{key}.json"));
        let json = serde_json::to_vec_pretty(item)?;
        write_atomic(&dir, &final_path, json).await
    }

    pub async fn delete(&self, identity: &TopicIdentity, key: &str) -> std::io::Result<()> {
        let Self::File { persist_root } = self else {
            return Ok(());
        };
        let path = identity.topic_dir(persist_root).join(format!("{key}.json"));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn restart_barrier_path(&self, identity: &TopicIdentity) -> Option<PathBuf> {
        match self {
            Self::Memory => None,
            Self::File { persist_root } => Some(identity.topic_dir(persist_root).join(".restarted")),
        }
    }

    pub async fn has_restart_barrier(&self, identity: &TopicIdentity) -> bool {
        match self.restart_barrier_path(identity) {
            Some(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            None => false,
        }
    }

    pub async fn write_restart_barrier(&self, identity: &TopicIdentity) -> std::io::Result<()> {
        let Some(path) = self.restart_barrier_path(identity) else { return Ok(()) };
        let dir = match path.parent() {
            Some(parent) => parent.to_path_buf(),
            None => {
                return Err(std::io::Error::other(format!(
                    "restart barrier path {} has no parent directory",
                    path.display()
                )))
            }
        };
        tokio::fs::create_dir_all(&dir).await?;
        write_atomic(&dir, &path, Vec::new()).await
    }

    pub async fn clear_restart_barrier(&self, identity: &TopicIdentity) -> std::io::Result<()> {
        let Some(path) = self.restart_barrier_path(identity) else { return Ok(()) };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

async fn write_atomic(dir: &Path, final_path: &Path, contents: Vec<u8>) -> std::io::Result<()> {
    let dir = dir.to_path_buf();
    let final_path = final_path.to_path_buf();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        use std::io::Write as _;
        tmp.write_all(&contents)?;
        tmp.flush()?;
        tmp.persist(&final_path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .unwrap_or_else(|e| Err(std::io::Error::other(e)))
}
