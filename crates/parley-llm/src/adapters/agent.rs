//! Adapter over the tool-using agent

use super::ChunkStream;
use crate::agent::{AgentFlow, AgentRunner};
use crate::chunk::Chunk;
use crate::tokens::TokenCalculator;
use async_stream::stream;
use parley_memory::{HistoryMessage, HistoryStore, Session};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub struct AgentAdapter {
    runner: Arc<dyn AgentRunner>,
    history: Arc<dyn HistoryStore>,
}

impl AgentAdapter {
    pub fn new(runner: Arc<dyn AgentRunner>, history: Arc<dyn HistoryStore>) -> Self {
        Self { runner, history }
    }

    pub fn stream(&self, question: String, session: &Session) -> ChunkStream {
        let runner = self.runner.clone();
        let history = self.history.clone();
        let session_id = session.id;

        Box::pin(stream! {
            let previous = match history.read_history(&session_id).await {
                Ok(previous) => previous,
                Err(e) => {
                    error!("Failed to read history for session {}: {}", session_id, e);
                    yield Ok(Chunk::error(e.to_string()));
                    return;
                }
            };

            let (sender, mut receiver) = mpsc::unbounded_channel();
            let run = tokio::spawn({
                let question = question.clone();
                async move { runner.run(question, previous, sender).await }
            });

            let mut streamed = String::new();
            while let Some(token) = receiver.recv().await {
                streamed.push_str(&token);
                yield Ok(Chunk::content(token));
            }

            let result = match run.await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    warn!("Agent run failed for session {}: {}", session_id, e);
                    yield Ok(Chunk::error(e.to_string()));
                    return;
                }
                Err(e) => {
                    error!("Agent task for session {} did not complete: {}", session_id, e);
                    yield Ok(Chunk::error(format!("agent task failed: {}", e)));
                    return;
                }
            };

            // Tool answers bypass the token channel
            if result != streamed {
                if AgentFlow::looks_like_flow(&result) {
                    match AgentFlow::parse(&result) {
                        Ok(flow) => debug!("Agent returned a flow with {} steps", flow.steps.len()),
                        Err(e) => warn!("Agent result looks like a flow but does not parse: {}", e),
                    }
                }
                yield Ok(Chunk::content(result.clone()));
            }

            let exchange = [
                HistoryMessage::user(question.clone()),
                HistoryMessage::model(result),
            ];
            for message in exchange {
                if let Err(e) = history.append_history(&session_id, message).await {
                    error!("Failed to append history for session {}: {}", session_id, e);
                }
            }

            let tokens = TokenCalculator::agent(&question, &streamed);
            info!("Agent answer for session {}: ~{} tokens", session_id, tokens);
            yield Ok(Chunk::tokens(tokens));
        })
    }
}
