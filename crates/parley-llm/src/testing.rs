//! Scripted collaborators shared by the unit tests

use crate::adapters::ChunkStream;
use crate::agent::AgentRunner;
use crate::chunk::Chunk;
use crate::upstream::{Fragment, FragmentStream, GenerationClient, GenerationRequest};
use async_trait::async_trait;
use futures_util::StreamExt;
use parley_common::{ParleyError, Result};
use parley_memory::{HistoryMessage, Question, QuestionStore};
use tokio::sync::{Mutex, mpsc};

/// Drain an adapter stream, panicking on `Err` items
pub(crate) async fn collect(stream: ChunkStream) -> Vec<Chunk> {
    stream.map(|item| item.unwrap()).collect().await
}

/// Plays back a fixed fragment script once
pub(crate) struct ScriptedClient {
    fragments: Mutex<Vec<Result<Fragment>>>,
    fail_with: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(fragments: Vec<Result<Fragment>>) -> Self {
        Self {
            fragments: Mutex::new(fragments),
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client whose call fails before producing anything
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate_stream(&self, request: GenerationRequest) -> Result<FragmentStream> {
        self.requests.lock().await.push(request);
        if let Some(message) = &self.fail_with {
            return Err(ParleyError::Upstream(message.clone()));
        }
        let fragments = std::mem::take(&mut *self.fragments.lock().await);
        Ok(Box::pin(futures::stream::iter(fragments)))
    }
}

/// Sends fixed tokens, then returns a fixed result
pub(crate) struct ScriptedRunner {
    tokens: Vec<String>,
    result: Mutex<Option<Result<String>>>,
    calls: Mutex<Vec<(String, Vec<HistoryMessage>)>>,
}

impl ScriptedRunner {
    pub(crate) fn new(tokens: &[&str], result: Result<String>) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            result: Mutex::new(Some(result)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn calls(&self) -> Vec<(String, Vec<HistoryMessage>)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    async fn run(
        &self,
        question: String,
        history: Vec<HistoryMessage>,
        tokens: mpsc::UnboundedSender<String>,
    ) -> Result<String> {
        self.calls.lock().await.push((question, history));
        for token in &self.tokens {
            let _ = tokens.send(token.clone());
        }
        self.result
            .lock()
            .await
            .take()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// A question store that always fails
pub(crate) struct BrokenQuestionStore;

#[async_trait]
impl QuestionStore for BrokenQuestionStore {
    async fn save_question(&self, _question: &Question) -> Result<()> {
        Err(ParleyError::Storage("disk full".to_string()))
    }
}
