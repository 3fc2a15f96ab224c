//! Upstream generation abstraction
//!
//! Provider adapters never touch a vendor SDK directly. They build a
//! [`GenerationRequest`] and consume the [`Fragment`]s a [`GenerationClient`]
//! streams back.

use async_trait::async_trait;
use futures_util::Stream;
use parley_common::{GeminiConfig, Result};
use parley_memory::HistoryMessage;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Sampling parameters forwarded with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Ask the model to expose its reasoning as separate thought parts
    pub include_thoughts: bool,
}

impl GenerationConfig {
    pub fn from_gemini(config: &GeminiConfig, include_thoughts: bool) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            include_thoughts,
        }
    }
}

/// One streaming generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    /// Prior history followed by the new user question
    pub contents: Vec<HistoryMessage>,
    pub config: GenerationConfig,
}

/// Usage totals reported by the upstream, cumulative for the call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub total_tokens: Option<u64>,
    pub thoughts_tokens: Option<u64>,
}

/// A piece of upstream output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub text: Option<String>,
    /// Set when the text is reasoning rather than answer
    pub thought: bool,
    pub usage: Option<UsageTotals>,
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn thought(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: true,
            usage: None,
        }
    }

    pub fn usage(usage: UsageTotals) -> Self {
        Self {
            usage: Some(usage),
            ..Default::default()
        }
    }

    /// Non-empty text, if any
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Fragment>> + Send>>;

/// A streaming text generation backend
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Start a generation call. A failing call may surface either here or as
    /// the first item of the returned stream.
    async fn generate_stream(&self, request: GenerationRequest) -> Result<FragmentStream>;
}
