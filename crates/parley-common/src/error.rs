//! Parley Common Error Types
//!
//! Centralized error handling for all Parley components

use std::fmt;

/// Main error type for Parley operations
#[derive(Debug)]
pub enum ParleyError {
    /// Generic error with message
    Generic(String),
    /// IO-related errors
    Io(std::io::Error),
    /// Serialization/deserialization errors
    Serde(serde_json::Error),
    /// Session/question/history storage errors
    Storage(String),
    /// Configuration errors
    Config(String),
    /// Upstream provider failure during generation
    Upstream(String),
    /// Agent loop or tool failures
    Agent(String),
    /// A chunk could not be written to the wire
    Encoding(String),
    /// The session does not exist or belongs to another identity
    SessionNotFound(String),
    /// The caller identity could not be resolved
    Auth(String),
    /// The request payload was rejected
    InvalidRequest(String),
}

impl fmt::Display for ParleyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParleyError::Generic(msg) => write!(f, "{}", msg),
            ParleyError::Io(err) => write!(f, "IO error: {}", err),
            ParleyError::Serde(err) => write!(f, "Serialization error: {}", err),
            ParleyError::Storage(msg) => write!(f, "Storage error: {}", msg),
            ParleyError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ParleyError::Upstream(msg) => write!(f, "{}", msg),
            ParleyError::Agent(msg) => write!(f, "Agent error: {}", msg),
            ParleyError::Encoding(msg) => write!(f, "Encoding error: {}", msg),
            ParleyError::SessionNotFound(id) => write!(f, "session {} not found", id),
            ParleyError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            ParleyError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ParleyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParleyError::Io(err) => Some(err),
            ParleyError::Serde(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience result type for Parley operations
pub type Result<T> = std::result::Result<T, ParleyError>;

// Implement From traits for common error types
impl From<std::io::Error> for ParleyError {
    fn from(err: std::io::Error) -> Self {
        ParleyError::Io(err)
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        ParleyError::Serde(err)
    }
}

impl From<anyhow::Error> for ParleyError {
    fn from(err: anyhow::Error) -> Self {
        ParleyError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = ParleyError::Upstream("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_session_not_found_message() {
        let err = ParleyError::SessionNotFound("abc".to_string());
        assert_eq!(err.to_string(), "session abc not found");
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ParleyError = io.into();
        assert!(matches!(err, ParleyError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
