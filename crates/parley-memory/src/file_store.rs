//! JSON file storage backend
//!
//! Layout under the data directory:
//!
//! ```text
//! sessions/<session-id>/session.json
//! sessions/<session-id>/chat_history.json
//! sessions/<session-id>/questions/<question-id>.json
//! ```

use crate::storage::{HistoryStore, QuestionStore, SessionStore};
use crate::types::{HistoryMessage, Question, Session};
use async_trait::async_trait;
use parley_common::{ParleyError, Result, files};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

pub struct FileStore {
    root: PathBuf,
    /// Serializes history read-modify-write cycles within this process
    history_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let root = data_dir.as_ref().to_path_buf();
        info!("File store rooted at {:?}", root);
        Self {
            root,
            history_lock: Mutex::new(()),
        }
    }

    fn session_dir(&self, id: &Uuid) -> PathBuf {
        self.root.join(files::SESSIONS_DIR).join(id.to_string())
    }

    async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(value)?;
        // Write-then-rename so readers never observe a partial file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    ParleyError::Storage(format!("corrupt file {:?}: {}", path, e))
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn save_session(&self, session: &Session) -> Result<()> {
        let path = self.session_dir(&session.id).join(files::SESSION_FILE);
        debug!("Writing session {} to {:?}", session.id, path);
        Self::write_json(&path, session).await
    }

    async fn find_session(&self, id: &Uuid) -> Result<Option<Session>> {
        let path = self.session_dir(id).join(files::SESSION_FILE);
        Self::read_json(&path).await
    }
}

#[async_trait]
impl QuestionStore for FileStore {
    async fn save_question(&self, question: &Question) -> Result<()> {
        let path = self
            .session_dir(&question.session_id)
            .join(files::QUESTIONS_DIR)
            .join(format!("{}.json", question.id));
        debug!("Writing question {} to {:?}", question.id, path);
        Self::write_json(&path, question).await
    }
}

#[async_trait]
impl HistoryStore for FileStore {
    async fn read_history(&self, session_id: &Uuid) -> Result<Vec<HistoryMessage>> {
        let path = self.session_dir(session_id).join(files::HISTORY_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }

    async fn append_history(&self, session_id: &Uuid, message: HistoryMessage) -> Result<()> {
        let _guard = self.history_lock.lock().await;
        let path = self.session_dir(session_id).join(files::HISTORY_FILE);
        let mut history: Vec<HistoryMessage> = Self::read_json(&path).await?.unwrap_or_default();
        history.push(message);
        Self::write_json(&path, &history).await
    }
}
