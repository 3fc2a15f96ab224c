//! Parley Memory - sessions, questions and conversation history
//!
//! This crate holds the domain records shared by the gateway and the
//! provider adapters, plus the storage traits they persist through.

pub mod file_store;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use file_store::FileStore;
pub use storage::{HistoryStore, InMemoryStore, QuestionStore, SessionStore, StoreSet};
pub use types::{ChatRole, HistoryMessage, NewSession, Question, Session};

// Re-export from parley-common for convenience
pub use parley_common::{ParleyError, Result};
