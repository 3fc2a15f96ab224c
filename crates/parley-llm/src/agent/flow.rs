//! Structured browser flows returned by navigation tools

use parley_common::AGENT_FLOW_MARKER;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentAction {
    Message,
    Click,
    Fill,
    Goto,
}

/// A single browser step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    pub action: AgentAction,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl AgentStep {
    pub fn new(action: AgentAction) -> Self {
        Self {
            action,
            selector: None,
            value: None,
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFlow {
    pub steps: Vec<AgentStep>,
}

impl AgentFlow {
    /// A flow that just shows a message
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            steps: vec![AgentStep::new(AgentAction::Message).with_value(text)],
        }
    }

    /// Whether `raw` claims to be a serialized flow
    pub fn looks_like_flow(raw: &str) -> bool {
        raw.starts_with(AGENT_FLOW_MARKER)
    }

    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Compact JSON; the output always begins with the flow marker
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
