// SPDX-License-Identifier: BUSL-1.1

use eve_pubsub::{Publication, TopicIdentity};
use eve_types::{
    AttestContext, DevicePortConfig, GlobalConfig, NodeAgentStatus, PersistImageStatus, VerifyImageConfig,
    VerifyImageStatus, ZbootStatus,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::NodeConfig;

/// `zedagent`'s config-fetch loop telling `nodeagent`'s upgrade FSM that a
/// poll cycle reached the controller (spec §4.D `record_controller_reach`/
/// `on_config_get_success`). Not one of the spec's data-model types — these
/// two agents otherwise only talk through `eve-pubsub` (spec §5), so this is
/// that channel rather than a shared handle between their tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerReachSignal {
    pub at_ms: u64,
    /// `true` only for `FetchOutcome::Success` (a fresh config body), not
    /// for `NotModified`/`ReadSaved`.
    pub config_get_success: bool,
}

impl eve_types::Publishable for ControllerReachSignal {
    fn key(&self) -> String {
        "controller-reach".to_string()
    }

    fn topic_name() -> &'static str {
        "ControllerReachSignal"
    }
}

/// Shared node state: the one `Arc` every agent task is spawned off, mirroring
/// the teacher's `MuxState`. Agents never share state directly — every field
/// here is a pub/sub handle (or the config/shutdown token every agent needs
/// to read and observe).
pub struct NodeState {
    pub config: NodeConfig,
    pub shutdown: CancellationToken,

    pub global_config: Publication<GlobalConfig>,
    pub node_agent_status: Publication<NodeAgentStatus>,
    pub zboot_status: Publication<ZbootStatus>,
    /// One key per candidate port configuration (spec §3); `eve-dpc`'s
    /// `DpcSelector` assembles these into a `DevicePortConfigList` each tick.
    pub device_port_config: Publication<DevicePortConfig>,
    pub attest_context: Publication<AttestContext>,
    pub verify_image_config: Publication<VerifyImageConfig>,
    pub verify_image_status: Publication<VerifyImageStatus>,
    /// Ref-counted, content-addressed image table the verifier agent's
    /// periodic GC sweep runs against (spec §4.F "Garbage collection").
    pub persist_image_status: Publication<PersistImageStatus>,
    pub controller_reach: Publication<ControllerReachSignal>,
}

impl NodeState {
    pub fn new(config: NodeConfig, shutdown: CancellationToken) -> Self {
        let persist_root = config.persist_root.clone();
        let persistent = |agent: &'static str, topic: &'static str| {
            Publication::new_persistent(TopicIdentity::new(agent, topic), persist_root.clone())
        };

        Self {
            global_config: persistent("zedagent", "GlobalConfig"),
            node_agent_status: persistent("nodeagent", "NodeAgentStatus"),
            zboot_status: Publication::new(TopicIdentity::new("zedagent", "ZbootStatus")),
            device_port_config: Publication::new(TopicIdentity::new("nim", "DevicePortConfig")),
            attest_context: persistent("tpmmgr", "AttestContext"),
            verify_image_config: Publication::new(TopicIdentity::new("zedagent", "VerifyImageConfig")),
            verify_image_status: Publication::new(TopicIdentity::new("verifier", "VerifyImageStatus")),
            persist_image_status: persistent("verifier", "PersistImageStatus"),
            controller_reach: Publication::new(TopicIdentity::new("zedagent", "ControllerReachSignal")),
            config,
            shutdown,
        }
    }
}
