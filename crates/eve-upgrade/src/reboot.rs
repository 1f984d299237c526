// SPDX-License-Identifier: BUSL-1.1

//! Reboot coordination record and persistent restart counter (spec §4.D).

use std::io;
use std::path::Path;

/// A pending reboot request. `stack` should already be truncated via
/// `NodeAgentStatus::set_reboot_stack` before being stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebootRequest {
    pub reason: String,
    pub stack: String,
    pub time_ms: u64,
}

/// Load the restart counter from `path`. A missing file means `0`
/// (first boot); any unparseable content is treated the same way rather
/// than failing the caller outright.
pub async fn load_restart_counter(path: &Path) -> u64 {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => s.trim().parse().unwrap_or(0),
        Err(_) => 0,
    }
}

/// Persist `counter` to `path` as ASCII decimal, atomically.
pub async fn save_restart_counter(path: &Path, counter: u64) -> io::Result<()> {
    let path = path.to_path_buf();
    let body = counter.to_string();
    tokio::task::spawn_blocking(move || save_blocking(&path, &body))
        .await
        .unwrap_or_else(|e| Err(io::Error::other(e)))
}

fn save_blocking(path: &Path, body: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, body.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Increment and persist the restart counter; returns the new value. Called
/// on every boot (spec §4.D: "increments a persistent RestartCounter file").
pub async fn bump_restart_counter(path: &Path) -> io::Result<u64> {
    let next = load_restart_counter(path).await + 1;
    save_restart_counter(path, next).await?;
    Ok(next)
}

#[cfg(test)]
#[path = "reboot_tests.rs"]
mod tests;
