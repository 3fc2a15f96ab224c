//! Tool-using agent
//!
//! The agent adapter drives an [`AgentRunner`]: it streams plain text tokens
//! through a channel while it runs and returns its final value at the end. A
//! tool marked `return_direct` short-circuits the run with the tool output.

pub mod flow;
pub mod runner;
pub mod tools;

use anyhow::Error;
use async_trait::async_trait;
use parley_common::Result;
use parley_memory::HistoryMessage;
use serde_json::Value;
use tokio::sync::mpsc;

pub use flow::{AgentAction, AgentFlow, AgentStep};
pub use runner::GenaiAgentRunner;
pub use tools::{ClockTool, ContactFormTool};

/// Runs one agent turn
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Answer `question` given prior `history`, sending streamed text to `tokens`.
    ///
    /// Returns the final value of the run, which may differ from the
    /// concatenated tokens when a tool answered directly.
    async fn run(
        &self,
        question: String,
        history: Vec<HistoryMessage>,
        tokens: mpsc::UnboundedSender<String>,
    ) -> Result<String>;
}

/// A tool the agent may call
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the tool's parameters
    fn schema(&self) -> Value;

    async fn execute(&self, params: Value) -> std::result::Result<Value, Error>;

    /// When true the tool output becomes the agent's final answer
    fn return_direct(&self) -> bool {
        false
    }

    fn to_genai_tool(&self) -> genai::chat::Tool {
        genai::chat::Tool::new(self.name())
            .with_description(self.description())
            .with_schema(self.schema())
    }
}

/// The tools every agent session gets
pub fn default_tools() -> Vec<Box<dyn AgentTool>> {
    vec![Box::new(ClockTool), Box::new(ContactFormTool::default())]
}
