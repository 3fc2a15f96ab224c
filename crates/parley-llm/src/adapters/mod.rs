//! Provider adapters
//!
//! An adapter turns one upstream provider call into a lazy [`ChunkStream`]
//! that ends with either a `tokens` chunk or a single `error` chunk. The
//! gateway picks the adapter by route.

pub mod agent;
pub mod gemini;

use crate::chunk::Chunk;
use futures_util::Stream;
use parley_common::Result;
use parley_memory::Session;
use std::pin::Pin;

pub use agent::AgentAdapter;
pub use gemini::{GeminiAdapter, GeminiMode};

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Chunk>> + Send>>;

/// The upstream strategies available to a question
pub enum ProviderAdapter {
    /// Gemini flash, or Gemini pro with reasoning exposed as `thought` chunks
    Gemini(GeminiAdapter),
    /// Tool-using agent
    ToolAugmented(AgentAdapter),
}

impl ProviderAdapter {
    pub fn stream(&self, question: String, session: &Session) -> ChunkStream {
        match self {
            ProviderAdapter::Gemini(adapter) => adapter.stream(question, session),
            ProviderAdapter::ToolAugmented(adapter) => adapter.stream(question, session),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderAdapter::Gemini(adapter) => match adapter.mode() {
                GeminiMode::Standard => "standard",
                GeminiMode::Thinking => "thinking",
            },
            ProviderAdapter::ToolAugmented(_) => "tool-augmented",
        }
    }
}
