//! Domain records persisted by the storage layer

use chrono::{DateTime, Utc};
use parley_common::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload accepted when a client opens a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    #[serde(default)]
    pub locales: Vec<String>,
}

/// A persistent conversation context owned by one identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user: String,
    /// Locale preferences, primary first
    pub locales: Vec<String>,
    #[serde(default = "parley_common::now")]
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for `user`; at least one locale is required
    pub fn new(user: impl Into<String>, locales: Vec<String>) -> Result<Self> {
        match locales.first() {
            None => {
                return Err(ParleyError::InvalidRequest(
                    "at least one locale is required".to_string(),
                ));
            }
            Some(primary) if primary.trim().is_empty() => {
                return Err(ParleyError::InvalidRequest(
                    "primary locale must not be blank".to_string(),
                ));
            }
            Some(_) => {}
        }

        Ok(Session {
            id: Uuid::new_v4(),
            user: user.into(),
            locales,
            created_at: parley_common::now(),
        })
    }

    pub fn primary_locale(&self) -> Option<&str> {
        self.locales.first().map(String::as_str)
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.user == user
    }

    /// Message that seeds a fresh history with the user's locale
    pub fn locale_message(&self) -> Option<HistoryMessage> {
        self.primary_locale()
            .map(|locale| HistoryMessage::user(format!("this is my locale: {}", locale)))
    }
}

/// Author of a history message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "assistant", alias = "ai")]
    Model,
}

/// One entry in a session's conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: ChatRole,
    pub content: String,
}

impl HistoryMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// A completed exchange handed to the question store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(session_id: Uuid, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            question: question.into(),
            answer: answer.into(),
            created_at: parley_common::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_requires_a_locale() {
        assert!(Session::new("alice", vec![]).is_err());
        assert!(Session::new("alice", vec!["  ".to_string()]).is_err());
        assert!(Session::new("alice", vec!["".to_string(), "en".to_string()]).is_err());

        let session = Session::new("alice", vec!["en-US".to_string(), "es".to_string()]).unwrap();
        assert_eq!(session.primary_locale(), Some("en-US"));
        assert!(session.is_owned_by("alice"));
        assert!(!session.is_owned_by("bob"));
    }

    #[test]
    fn test_locale_message() {
        let session = Session::new("alice", vec!["fr-FR".to_string()]).unwrap();
        let message = session.locale_message().unwrap();
        assert_eq!(message.role, ChatRole::User);
        assert_eq!(message.content, "this is my locale: fr-FR");
    }

    #[test]
    fn test_role_wire_names() {
        let json = serde_json::to_string(&HistoryMessage::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","content":"hi"}"#);

        let parsed: HistoryMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"hey"}"#).unwrap();
        assert_eq!(parsed.role, ChatRole::Model);
    }

    #[test]
    fn test_session_without_timestamp_deserializes() {
        let raw = r#"{"id":"7f1c2a5e-8d53-4c1e-9a53-0b8f4a4c2d10","user":"u","locales":["en"]}"#;
        let session: Session = serde_json::from_str(raw).unwrap();
        assert_eq!(session.user, "u");
    }
}
