//! Parley LLM - upstream adapters and the chunk streaming pipeline
//!
//! This crate turns provider-specific streaming responses into one uniform
//! sequence of [`Chunk`]s, records finished exchanges, and encodes the result
//! for the wire.

pub mod adapters;
pub mod agent;
pub mod chunk;
pub mod genai_client;
pub mod streaming;
pub mod tokens;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for convenience
pub use adapters::{AgentAdapter, ChunkStream, GeminiAdapter, GeminiMode, ProviderAdapter};
pub use agent::{AgentFlow, AgentRunner, AgentTool, GenaiAgentRunner};
pub use chunk::Chunk;
pub use genai_client::GenaiGenerationClient;
pub use streaming::{FrameStream, ResponseAggregator, WireEncoder};
pub use tokens::TokenCalculator;
pub use upstream::{
    Fragment, FragmentStream, GenerationClient, GenerationConfig, GenerationRequest, UsageTotals,
};
