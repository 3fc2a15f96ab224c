//! Common constants used across Parley

/// Default data directory for file-backed stores
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Capacity of the channel between an upstream pump task and its consumer
pub const DEFAULT_FRAGMENT_BUFFER: usize = 64;

/// Prefix that marks an agent result as a structured browser flow
pub const AGENT_FLOW_MARKER: &str = "{\"steps\":";

/// Weight applied to word counts when the agent has no usage report
pub const AGENT_TOKEN_WEIGHT: f64 = 0.75;

/// Common model identifiers
pub mod models {
    pub const GEMINI_FLASH: &str = "gemini-2.5-flash";
    pub const GEMINI_PRO: &str = "gemini-2.5-pro";
    pub const GPT_4O_MINI: &str = "gpt-4o-mini";
}

/// Generation defaults
pub mod generation {
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;
    pub const DEFAULT_TOP_P: f64 = 0.9;
    pub const DEFAULT_TOP_K: u32 = 40;
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;
    /// Pacing delay after each forwarded fragment, in milliseconds
    pub const DEFAULT_CHUNK_DELAY_MS: u64 = 10;
    pub const DEFAULT_AGENT_MAX_ITERATIONS: usize = 3;
    pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
}

/// File names used by the file-backed stores
pub mod files {
    pub const SESSIONS_DIR: &str = "sessions";
    pub const SESSION_FILE: &str = "session.json";
    pub const HISTORY_FILE: &str = "chat_history.json";
    pub const QUESTIONS_DIR: &str = "questions";
}
