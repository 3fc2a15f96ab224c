//! The chunk protocol
//!
//! Every answer is delivered as an ordered sequence of [`Chunk`]s. A chunk is
//! internally tagged by `kind` and only carries the fields its kind implies,
//! so absent fields never reach the wire.

use serde::{Deserialize, Serialize};

/// Atomic unit of a streamed answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Chunk {
    /// A fragment of the answer text
    Content { content: String },
    /// A fragment of the model's reasoning, only produced in thinking mode
    Thought { content: String },
    /// Token usage for the whole exchange
    Tokens {
        tokens: u64,
        #[serde(
            rename = "thoughtTokens",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        thought_tokens: Option<u64>,
    },
    /// Human-readable failure description
    Error { error: String },
    /// Stream terminator appended by the wire encoder
    End,
}

impl Chunk {
    pub fn content(text: impl Into<String>) -> Self {
        Chunk::Content {
            content: text.into(),
        }
    }

    pub fn thought(text: impl Into<String>) -> Self {
        Chunk::Thought {
            content: text.into(),
        }
    }

    pub fn tokens(tokens: u64) -> Self {
        Chunk::Tokens {
            tokens,
            thought_tokens: None,
        }
    }

    pub fn tokens_with_thoughts(tokens: u64, thought_tokens: u64) -> Self {
        Chunk::Tokens {
            tokens,
            thought_tokens: Some(thought_tokens),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Chunk::Error {
            error: message.into(),
        }
    }

    pub fn end() -> Self {
        Chunk::End
    }

    /// Whether this chunk closes an adapter sequence
    pub fn is_terminal(&self) -> bool {
        matches!(self, Chunk::Tokens { .. } | Chunk::Error { .. } | Chunk::End)
    }

    /// Text carried by `content` and `thought` chunks
    pub fn text(&self) -> Option<&str> {
        match self {
            Chunk::Content { content } | Chunk::Thought { content } => Some(content),
            _ => None,
        }
    }

    /// Wire name of this chunk's kind
    pub fn kind(&self) -> &'static str {
        match self {
            Chunk::Content { .. } => "content",
            Chunk::Thought { .. } => "thought",
            Chunk::Tokens { .. } => "tokens",
            Chunk::Error { .. } => "error",
            Chunk::End => "end",
        }
    }
}
