// SPDX-License-Identifier: BUSL-1.1

//! Process-launch configuration for the node binary, analogous to the
//! teacher's `MuxConfig`: plain `clap::Args` flattened into the top-level
//! CLI, one env var per flag.

use std::path::PathBuf;

#[derive(Debug, Clone, clap::Args)]
pub struct NodeConfig {
    /// Host the local operator status endpoint binds on.
    #[arg(long, default_value = "127.0.0.1", env = "EVE_NODE_HOST")]
    pub host: String,

    /// Port the local operator status endpoint listens on.
    #[arg(long, default_value_t = 4145, env = "EVE_NODE_PORT")]
    pub port: u16,

    /// Root directory for persistent publications (spec §4.A).
    #[arg(long, default_value = "/persist/status", env = "EVE_NODE_PERSIST_ROOT")]
    pub persist_root: PathBuf,

    /// Directory for per-agent watchdog touch files (spec §4.B).
    #[arg(long, default_value = "/run/watchdog/pid", env = "EVE_NODE_WATCHDOG_DIR")]
    pub watchdog_dir: PathBuf,

    /// Root directory for the staged image verification pipeline (spec §4.F).
    #[arg(long, default_value = "/persist/downloads", env = "EVE_NODE_DOWNLOAD_ROOT")]
    pub download_root: PathBuf,
}
