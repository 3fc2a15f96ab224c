//! Gemini-style adapter, with or without thinking

use super::ChunkStream;
use crate::chunk::Chunk;
use crate::tokens::TokenCalculator;
use crate::upstream::{GenerationClient, GenerationConfig, GenerationRequest, UsageTotals};
use async_stream::stream;
use futures_util::StreamExt;
use parley_common::GeminiConfig;
use parley_memory::{HistoryMessage, HistoryStore, Session};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiMode {
    Standard,
    Thinking,
}

pub struct GeminiAdapter {
    client: Arc<dyn GenerationClient>,
    history: Arc<dyn HistoryStore>,
    config: Arc<GeminiConfig>,
    mode: GeminiMode,
}

impl GeminiAdapter {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        history: Arc<dyn HistoryStore>,
        config: Arc<GeminiConfig>,
        mode: GeminiMode,
    ) -> Self {
        Self {
            client,
            history,
            config,
            mode,
        }
    }

    pub fn mode(&self) -> GeminiMode {
        self.mode
    }

    fn model(&self) -> &str {
        match self.mode {
            GeminiMode::Standard => &self.config.flash_model,
            GeminiMode::Thinking => &self.config.pro_model,
        }
    }

    pub fn stream(&self, question: String, session: &Session) -> ChunkStream {
        let client = self.client.clone();
        let history = self.history.clone();
        let thinking = self.mode == GeminiMode::Thinking;
        let delay = self.config.chunk_delay();
        let model = self.model().to_string();
        let generation = GenerationConfig::from_gemini(&self.config, thinking);
        let session_id = session.id;

        Box::pin(stream! {
            let mut contents = match history.read_history(&session_id).await {
                Ok(contents) => contents,
                Err(e) => {
                    error!("Failed to read history for session {}: {}", session_id, e);
                    yield Ok(Chunk::error(e.to_string()));
                    return;
                }
            };
            contents.push(HistoryMessage::user(question.clone()));

            let request = GenerationRequest {
                model,
                contents,
                config: generation,
            };
            let mut fragments = match client.generate_stream(request).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    warn!("Upstream call failed for session {}: {}", session_id, e);
                    yield Ok(Chunk::error(e.to_string()));
                    return;
                }
            };

            let mut answer = String::new();
            let mut thoughts = String::new();
            let mut usage: Option<UsageTotals> = None;

            while let Some(item) = fragments.next().await {
                let fragment = match item {
                    Ok(fragment) => fragment,
                    Err(e) => {
                        warn!("Upstream stream failed for session {}: {}", session_id, e);
                        yield Ok(Chunk::error(e.to_string()));
                        return;
                    }
                };

                if let Some(reported) = fragment.usage {
                    usage = Some(reported);
                }
                let Some(text) = fragment.non_empty_text() else {
                    continue;
                };

                if thinking && fragment.thought {
                    thoughts.push_str(text);
                    yield Ok(Chunk::thought(text));
                } else {
                    answer.push_str(text);
                    yield Ok(Chunk::content(text));
                }

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            let exchange = [
                HistoryMessage::user(question.clone()),
                HistoryMessage::model(answer.clone()),
            ];
            for message in exchange {
                if let Err(e) = history.append_history(&session_id, message).await {
                    error!("Failed to append history for session {}: {}", session_id, e);
                }
            }

            if thinking {
                let (total, thought_tokens) =
                    TokenCalculator::thinking(&question, &answer, &thoughts, usage.as_ref());
                info!(
                    "Thinking answer for session {}: {} tokens ({} thinking)",
                    session_id, total, thought_tokens
                );
                yield Ok(Chunk::tokens_with_thoughts(total, thought_tokens));
            } else {
                let total = TokenCalculator::standard(&question, &answer, usage.as_ref());
                debug!("Answer for session {}: {} tokens", session_id, total);
                yield Ok(Chunk::tokens(total));
            }
        })
    }
}
