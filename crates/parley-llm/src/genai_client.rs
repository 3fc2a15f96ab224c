//! [`GenerationClient`] backed by the `genai` crate

use crate::upstream::{Fragment, FragmentStream, GenerationClient, GenerationRequest, UsageTotals};
use async_trait::async_trait;
use futures_util::StreamExt;
use genai::Client as GenaiClient;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent, Usage};
use parley_common::{DEFAULT_FRAGMENT_BUFFER, ParleyError, Result};
use parley_memory::{ChatRole, HistoryMessage};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

pub(crate) fn to_genai_message(message: &HistoryMessage) -> ChatMessage {
    match message.role {
        ChatRole::User => ChatMessage::user(message.content.clone()),
        ChatRole::Model => ChatMessage::assistant(message.content.clone()),
    }
}

pub(crate) fn usage_totals(usage: &Usage) -> UsageTotals {
    UsageTotals {
        total_tokens: usage.total_tokens.map(|t| t.max(0) as u64),
        thoughts_tokens: usage
            .completion_tokens_details
            .as_ref()
            .and_then(|d| d.reasoning_tokens)
            .map(|t| t.max(0) as u64),
    }
}

pub(crate) fn upstream_error(e: impl std::fmt::Display) -> ParleyError {
    ParleyError::Upstream(e.to_string())
}

pub struct GenaiGenerationClient {
    client: GenaiClient,
}

impl GenaiGenerationClient {
    pub fn new() -> Self {
        Self {
            client: GenaiClient::default(),
        }
    }

    fn chat_options(request: &GenerationRequest) -> ChatOptions {
        ChatOptions {
            temperature: Some(request.config.temperature),
            top_p: Some(request.config.top_p),
            max_tokens: Some(request.config.max_output_tokens),
            capture_usage: Some(true),
            capture_reasoning_content: Some(request.config.include_thoughts),
            ..Default::default()
        }
    }

    fn fragment_from_event(event: ChatStreamEvent) -> Option<Fragment> {
        match event {
            ChatStreamEvent::Start => None,
            ChatStreamEvent::Chunk(c) => Some(Fragment::text(c.content)),
            ChatStreamEvent::ReasoningChunk(c) => Some(Fragment::thought(c.content)),
            ChatStreamEvent::ToolCallChunk(t) => {
                debug!("Ignoring tool call chunk for {}", t.tool_call.fn_name);
                None
            }
            ChatStreamEvent::End(end) => end
                .captured_usage
                .as_ref()
                .map(|usage| Fragment::usage(usage_totals(usage))),
        }
    }
}

impl Default for GenaiGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationClient for GenaiGenerationClient {
    async fn generate_stream(&self, request: GenerationRequest) -> Result<FragmentStream> {
        let (sender, receiver) = mpsc::channel(DEFAULT_FRAGMENT_BUFFER);
        let client = self.client.clone();

        // The upstream call and its event loop run off the request task
        tokio::spawn(async move {
            let options = Self::chat_options(&request);
            let messages: Vec<ChatMessage> =
                request.contents.iter().map(to_genai_message).collect();
            if request.config.top_k > 0 {
                debug!("top_k={} is not forwarded by this backend", request.config.top_k);
            }

            info!(
                "Starting generation with {} ({} messages)",
                request.model,
                messages.len()
            );
            let response = match client
                .exec_chat_stream(&request.model, ChatRequest::new(messages), Some(&options))
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Generation call failed: {}", e);
                    let _ = sender.send(Err(upstream_error(e))).await;
                    return;
                }
            };

            let mut stream = response.stream;
            while let Some(event) = stream.next().await {
                let item = match event {
                    Ok(event) => match Self::fragment_from_event(event) {
                        Some(fragment) => Ok(fragment),
                        None => continue,
                    },
                    Err(e) => Err(upstream_error(e)),
                };
                let failed = item.is_err();
                if sender.send(item).await.is_err() {
                    debug!("Fragment consumer went away, stopping upstream pump");
                    return;
                }
                if failed {
                    return;
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(receiver)))
    }
}
