//! Agent loop over `genai` with tool calling

use super::{AgentRunner, AgentTool, default_tools};
use crate::genai_client::{to_genai_message, upstream_error};
use async_trait::async_trait;
use futures_util::StreamExt;
use genai::Client as GenaiClient;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent, ToolCall, ToolResponse};
use parley_common::{AgentConfig, ParleyError, Result};
use parley_memory::HistoryMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct GenaiAgentRunner {
    client: GenaiClient,
    config: Arc<AgentConfig>,
    tools: Vec<Box<dyn AgentTool>>,
}

impl GenaiAgentRunner {
    pub fn new(config: Arc<AgentConfig>) -> Self {
        Self::with_tools(config, default_tools())
    }

    pub fn with_tools(config: Arc<AgentConfig>, tools: Vec<Box<dyn AgentTool>>) -> Self {
        Self {
            client: GenaiClient::default(),
            config,
            tools,
        }
    }

    pub fn find_tool(&self, name: &str) -> Option<&dyn AgentTool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|b| b.as_ref())
    }

    fn chat_request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        let mut request = ChatRequest::new(messages).with_system(self.config.system_prompt.clone());
        if !self.tools.is_empty() {
            let tools: Vec<_> = self.tools.iter().map(|t| t.to_genai_tool()).collect();
            request = request.with_tools(tools);
        }
        request
    }

    /// Execute a call; failures are reported back to the model as text
    async fn call_tool(&self, call: &ToolCall) -> (String, bool) {
        let Some(tool) = self.find_tool(&call.fn_name) else {
            warn!("Agent requested unknown tool {}", call.fn_name);
            return (format!("Tool '{}' not found", call.fn_name), false);
        };

        match tool.execute(call.fn_arguments.clone()).await {
            Ok(value) => {
                info!("Tool {} completed", call.fn_name);
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (text, tool.return_direct())
            }
            Err(e) => {
                warn!("Tool {} failed: {}", call.fn_name, e);
                (format!("Error executing tool {}: {}", call.fn_name, e), false)
            }
        }
    }
}

#[async_trait]
impl AgentRunner for GenaiAgentRunner {
    async fn run(
        &self,
        question: String,
        history: Vec<HistoryMessage>,
        tokens: mpsc::UnboundedSender<String>,
    ) -> Result<String> {
        let options = ChatOptions {
            temperature: Some(self.config.temperature),
            capture_tool_calls: Some(true),
            ..Default::default()
        };

        let mut messages: Vec<ChatMessage> = history.iter().map(to_genai_message).collect();
        messages.push(ChatMessage::user(question));

        for iteration in 1..=self.config.max_iterations {
            debug!(
                "Agent iteration {} with {} messages",
                iteration,
                messages.len()
            );

            let response = self
                .client
                .exec_chat_stream(
                    &self.config.model,
                    self.chat_request(messages.clone()),
                    Some(&options),
                )
                .await
                .map_err(upstream_error)?;

            let mut stream = response.stream;
            let mut text = String::new();
            let mut tool_calls: Vec<ToolCall> = Vec::new();

            while let Some(event) = stream.next().await {
                match event.map_err(upstream_error)? {
                    ChatStreamEvent::Chunk(c) => {
                        if !c.content.is_empty() {
                            text.push_str(&c.content);
                            if tokens.send(c.content).is_err() {
                                debug!("Token receiver closed, abandoning agent run");
                                return Err(ParleyError::Agent("token receiver closed".to_string()));
                            }
                        }
                    }
                    ChatStreamEvent::ToolCallChunk(t) => {
                        let call = t.tool_call;
                        match tool_calls.iter_mut().find(|c| c.call_id == call.call_id) {
                            Some(existing) => *existing = call,
                            None => tool_calls.push(call),
                        }
                    }
                    ChatStreamEvent::Start
                    | ChatStreamEvent::ReasoningChunk(_)
                    | ChatStreamEvent::End(_) => {}
                }
            }

            if tool_calls.is_empty() {
                return Ok(text);
            }

            messages.push(ChatMessage::from(tool_calls.clone()));
            for call in &tool_calls {
                let (result, direct) = self.call_tool(call).await;
                if direct {
                    return Ok(result);
                }
                messages.push(ChatMessage::from(ToolResponse::new(
                    call.call_id.clone(),
                    result,
                )));
            }
        }

        Err(ParleyError::Agent(format!(
            "agent stopped after {} iterations without an answer",
            self.config.max_iterations
        )))
    }
}
