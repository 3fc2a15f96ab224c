//! Configuration types and utilities for Parley
//!
//! Configuration is loaded once at startup into an immutable [`AppConfig`]
//! and shared with the provider adapters behind an `Arc`.

use crate::constants::{generation, models, DEFAULT_DATA_DIR};
use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Top-level configuration for the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub agent: AgentConfig,
    pub storage: StorageConfig,
}

/// Settings for the Gemini-style standard and thinking adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model used by the standard adapter
    pub flash_model: String,
    /// Model used by the thinking adapter
    pub pro_model: String,
    pub temperature: f64,
    pub top_p: f64,
    /// Not every backend honours top-k; it is forwarded when supported
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Pacing delay after each forwarded fragment
    pub chunk_delay_ms: u64,
}

impl GeminiConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            flash_model: models::GEMINI_FLASH.to_string(),
            pro_model: models::GEMINI_PRO.to_string(),
            temperature: generation::DEFAULT_TEMPERATURE,
            top_p: generation::DEFAULT_TOP_P,
            top_k: generation::DEFAULT_TOP_K,
            max_output_tokens: generation::DEFAULT_MAX_OUTPUT_TOKENS,
            chunk_delay_ms: generation::DEFAULT_CHUNK_DELAY_MS,
        }
    }
}

/// Settings for the tool-augmented agent adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,
    pub temperature: f64,
    pub system_prompt: String,
    /// Upper bound on model round-trips within one agent run
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: models::GPT_4O_MINI.to_string(),
            temperature: generation::DEFAULT_TEMPERATURE,
            system_prompt: generation::DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: generation::DEFAULT_AGENT_MAX_ITERATIONS,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type
    pub backend: StorageBackend,
    /// Root directory for file-based backends
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    /// JSON files under the data directory, one folder per session
    File,
    /// Process-local maps, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ParleyError::Config(format!(
                "unknown storage backend '{}'",
                other
            ))),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let chunk_delay_ms = match lookup("GEMINI_CHUNK_DELAY") {
            // Expressed in (fractional) seconds
            Some(raw) => {
                let secs: f64 = parse_value("GEMINI_CHUNK_DELAY", &raw)?;
                if secs < 0.0 {
                    return Err(ParleyError::Config(
                        "GEMINI_CHUNK_DELAY must not be negative".to_string(),
                    ));
                }
                (secs * 1000.0).round() as u64
            }
            None => defaults.gemini.chunk_delay_ms,
        };

        let gemini = GeminiConfig {
            flash_model: lookup("GEMINI_FLASH_MODEL").unwrap_or(defaults.gemini.flash_model),
            pro_model: lookup("GEMINI_PRO_MODEL").unwrap_or(defaults.gemini.pro_model),
            temperature: env_or(&lookup, "GEMINI_TEMPERATURE", defaults.gemini.temperature)?,
            top_p: env_or(&lookup, "GEMINI_TOP_P", defaults.gemini.top_p)?,
            top_k: env_or(&lookup, "GEMINI_TOP_K", defaults.gemini.top_k)?,
            max_output_tokens: env_or(
                &lookup,
                "GEMINI_MAX_OUTPUT_TOKENS",
                defaults.gemini.max_output_tokens,
            )?,
            chunk_delay_ms,
        };

        let agent = AgentConfig {
            model: lookup("MODEL_NAME").unwrap_or(defaults.agent.model),
            temperature: env_or(&lookup, "TEMPERATURE", defaults.agent.temperature)?,
            system_prompt: lookup("SYSTEM_PROMPT").unwrap_or(defaults.agent.system_prompt),
            max_iterations: env_or(
                &lookup,
                "AGENT_MAX_ITERATIONS",
                defaults.agent.max_iterations,
            )?,
        };

        let storage = StorageConfig {
            backend: env_or(&lookup, "PARLEY_STORAGE", defaults.storage.backend)?,
            data_dir: lookup("PARLEY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage.data_dir),
        };

        Ok(AppConfig {
            gemini,
            agent,
            storage,
        })
    }
}

fn env_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ParleyError::Config(format!("invalid value '{}' for {}", raw, key)))
}
