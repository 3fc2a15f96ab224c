//! Storage traits for sessions, questions and conversation history
//!
//! The streaming core only talks to these traits. Two backends are provided:
//! [`InMemoryStore`] for tests and ephemeral deployments, and
//! [`FileStore`](crate::file_store::FileStore) which keeps one folder per
//! session under a data directory.

use crate::file_store::FileStore;
use crate::types::{HistoryMessage, Question, Session};
use async_trait::async_trait;
use parley_common::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Persists sessions and looks them up by id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store (or overwrite) a session
    async fn save_session(&self, session: &Session) -> Result<()>;

    /// Retrieve a session by its ID
    async fn find_session(&self, id: &Uuid) -> Result<Option<Session>>;
}

/// Receives finished question/answer records
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn save_question(&self, question: &Question) -> Result<()>;
}

/// Append-only conversation history keyed by session id
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Full history in insertion order; empty for unknown sessions
    async fn read_history(&self, session_id: &Uuid) -> Result<Vec<HistoryMessage>>;

    async fn append_history(&self, session_id: &Uuid, message: HistoryMessage) -> Result<()>;
}

/// The three collaborators the gateway needs, usually backed by one store
#[derive(Clone)]
pub struct StoreSet {
    pub sessions: Arc<dyn SessionStore>,
    pub questions: Arc<dyn QuestionStore>,
    pub history: Arc<dyn HistoryStore>,
}

impl StoreSet {
    /// Share a single backend for all three roles
    pub fn from_backend<S>(store: Arc<S>) -> Self
    where
        S: SessionStore + QuestionStore + HistoryStore + 'static,
    {
        StoreSet {
            sessions: store.clone(),
            questions: store.clone(),
            history: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(InMemoryStore::new()))
    }

    pub fn file(data_dir: impl AsRef<Path>) -> Self {
        Self::from_backend(Arc::new(FileStore::new(data_dir)))
    }
}

/// Process-local store guarded by async read/write locks
#[derive(Default)]
pub struct InMemoryStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    questions: RwLock<Vec<Question>>,
    history: RwLock<HashMap<Uuid, Vec<HistoryMessage>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Questions recorded for a session, oldest first
    pub async fn questions_for(&self, session_id: &Uuid) -> Vec<Question> {
        self.questions
            .read()
            .await
            .iter()
            .filter(|q| &q.session_id == session_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn save_session(&self, session: &Session) -> Result<()> {
        debug!("Storing session {}", session.id);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session(&self, id: &Uuid) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }
}

#[async_trait]
impl QuestionStore for InMemoryStore {
    async fn save_question(&self, question: &Question) -> Result<()> {
        debug!(
            "Storing question {} for session {}",
            question.id, question.session_id
        );
        self.questions.write().await.push(question.clone());
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    async fn read_history(&self, session_id: &Uuid) -> Result<Vec<HistoryMessage>> {
        Ok(self
            .history
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_history(&self, session_id: &Uuid, message: HistoryMessage) -> Result<()> {
        self.history
            .write()
            .await
            .entry(*session_id)
            .or_default()
            .push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = InMemoryStore::new();
        let session = Session::new("alice", vec!["en-US".to_string()]).unwrap();

        store.save_session(&session).await.unwrap();
        let found = store.find_session(&session.id).await.unwrap();
        assert_eq!(found, Some(session));

        let missing = store.find_session(&Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_history_keeps_insertion_order() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();

        assert!(store.read_history(&id).await.unwrap().is_empty());

        store.append_history(&id, HistoryMessage::user("one")).await.unwrap();
        store.append_history(&id, HistoryMessage::model("two")).await.unwrap();
        store.append_history(&id, HistoryMessage::user("three")).await.unwrap();

        let history = store.read_history(&id).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_questions_are_scoped_by_session() {
        let store = InMemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.save_question(&Question::new(a, "q1", "a1")).await.unwrap();
        store.save_question(&Question::new(b, "q2", "a2")).await.unwrap();

        let for_a = store.questions_for(&a).await;
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].answer, "a1");
    }

    #[tokio::test]
    async fn test_store_set_shares_backend() {
        let backend = Arc::new(InMemoryStore::new());
        let stores = StoreSet::from_backend(backend.clone());
        let session = Session::new("bob", vec!["es".to_string()]).unwrap();

        stores.sessions.save_session(&session).await.unwrap();
        assert!(backend.find_session(&session.id).await.unwrap().is_some());
    }
}
