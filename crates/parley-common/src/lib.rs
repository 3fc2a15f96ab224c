//! Parley Common - Shared utilities and types
//!
//! This crate provides the common error type, configuration structs,
//! and utility functions used across all Parley components.

pub mod config;
pub mod constants;
pub mod error;
pub mod utils;

// Re-export commonly used items
pub use error::{ParleyError, Result};
pub use config::{AgentConfig, AppConfig, GeminiConfig, StorageBackend, StorageConfig};
pub use constants::*;
pub use utils::*;
