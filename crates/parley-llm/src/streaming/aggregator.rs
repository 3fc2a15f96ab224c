//! Response aggregation
//!
//! The aggregator forwards an adapter stream untouched while accumulating the
//! answer text, and records the finished exchange once the stream is
//! exhausted. A stream dropped early (client gone) records nothing.

use crate::adapters::ChunkStream;
use crate::chunk::Chunk;
use async_stream::stream;
use futures_util::StreamExt;
use parley_common::format_duration_secs;
use parley_memory::{Question, QuestionStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ResponseAggregator {
    questions: Arc<dyn QuestionStore>,
}

impl ResponseAggregator {
    pub fn new(questions: Arc<dyn QuestionStore>) -> Self {
        Self { questions }
    }

    /// Wrap `source`, persisting the exchange after its last chunk
    pub fn wrap(&self, session_id: Uuid, question: String, source: ChunkStream) -> ChunkStream {
        let questions = self.questions.clone();

        Box::pin(stream! {
            let mut source = source;
            let started = Instant::now();
            let mut answer = String::new();
            let mut delivered_content = false;
            let mut ended_in_error = false;
            let mut terminated = false;

            while let Some(item) = source.next().await {
                match item {
                    Ok(chunk) => {
                        ended_in_error = matches!(chunk, Chunk::Error { .. });
                        terminated = chunk.is_terminal();
                        if let Chunk::Content { content } = &chunk {
                            answer.push_str(content);
                            delivered_content = true;
                        }
                        yield Ok(chunk);
                    }
                    Err(e) => {
                        warn!("Answer stream for session {} failed: {}", session_id, e);
                        yield Ok(Chunk::error(e.to_string()));
                        return;
                    }
                }
            }

            if !terminated {
                warn!("Answer stream for session {} ended without a terminal chunk", session_id);
            }
            if ended_in_error && !delivered_content {
                debug!("Not recording failed exchange for session {}", session_id);
                return;
            }

            let record = Question::new(session_id, question, answer);
            match questions.save_question(&record).await {
                Ok(()) => info!(
                    "Recorded question {} for session {} after {}",
                    record.id,
                    session_id,
                    format_duration_secs(started.elapsed().as_secs_f64())
                ),
                Err(e) => error!("Failed to record question for session {}: {}", session_id, e),
            }
        })
    }
}
