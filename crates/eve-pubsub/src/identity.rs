// SPDX-License-Identifier: BUSL-1.1

use std::path::PathBuf;

/// Identity of a publication: `(agentName, agentScope?, topicName)` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicIdentity {
    pub agent_name: String,
    pub agent_scope: Option<String>,
    pub topic_name: &'static str,
}

impl TopicIdentity {
    pub fn new(agent_name: impl Into<String>, topic_name: &'static str) -> Self {
        Self { agent_name: agent_name.into(), agent_scope: None, topic_name }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.agent_scope = Some(scope.into());
        self
    }

    /// Directory segment for this identity: `<agent>` or `<agent>__<scope>`.
    fn dir_segment(&self) -> String {
        match &self.agent_scope {
            Some(scope) => format!("{}__{}", self.agent_name, scope),
            None => self.agent_name.clone(),
        }
    }

    /// `<persist_root>/config/<agent>[__<scope>]/<topic>/` (spec §6).
    pub fn topic_dir(&self, persist_root: &std::path::Path) -> PathBuf {
        persist_root.join("config").join(self.dir_segment()).join(self.topic_name)
    }
}
