// SPDX-License-Identifier: BUSL-1.1

//! Integrity-token persistence (spec §4.E: "store the opaque integrity
//! token (persisted to disk)"), atomic write-tmp-then-rename like every
//! other on-disk record in this workspace.

use std::io;
use std::path::{Path, PathBuf};

pub async fn save(path: &Path, token: &[u8]) -> io::Result<()> {
    let path = path.to_path_buf();
    let token = token.to_vec();
    tokio::task::spawn_blocking(move || save_blocking(&path, &token))
        .await
        .unwrap_or_else(|e| Err(io::Error::other(e)))
}

fn save_blocking(path: &Path, token: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, token)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub async fn load(path: &Path) -> Option<Vec<u8>> {
    tokio::fs::read(path).await.ok()
}

/// Conventional location under the persist root.
pub fn default_path(persist_root: &Path) -> PathBuf {
    persist_root.join("status").join("integrity-token")
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
