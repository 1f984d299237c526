// SPDX-License-Identifier: BUSL-1.1

//! Saved-config fallback (spec §4.C): the last successfully-fetched raw
//! response is checkpointed to disk so a fully offline boot can still come
//! up with the last-known config, as long as it isn't older than
//! `StaleConfigTime`.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Atomically persist `body` as the new checkpoint (write tmp + rename,
/// mirroring the pattern used for every other on-disk publication in this
/// workspace).
pub async fn save(path: &Path, body: &[u8]) -> io::Result<()> {
    let path = path.to_path_buf();
    let body = body.to_vec();
    tokio::task::spawn_blocking(move || save_blocking(&path, &body))
        .await
        .unwrap_or_else(|e| Err(io::Error::other(e)))
}

fn save_blocking(path: &Path, body: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, body)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load the checkpoint if it exists and is no older than `max_age`
/// (spec §4.C "Tie-breaks": "a checkpoint older than StaleConfigTime is
/// ignored"). Age is measured against the file's modification time.
pub async fn load_if_fresh(path: &Path, max_age: Duration) -> Option<Vec<u8>> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || load_if_fresh_blocking(&path, max_age))
        .await
        .ok()
        .flatten()
}

fn load_if_fresh_blocking(path: &Path, max_age: Duration) -> Option<Vec<u8>> {
    let meta = std::fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    let age = SystemTime::now().duration_since(modified).ok()?;
    if age > max_age {
        return None;
    }
    std::fs::read(path).ok()
}

/// Conventional checkpoint location under a persist root, per spec §4.C.
pub fn default_path(persist_root: &Path) -> PathBuf {
    persist_root.join("checkpoint").join("lastconfig")
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
