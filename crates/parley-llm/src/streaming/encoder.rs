//! Wire encoding of chunk streams
//!
//! Each chunk becomes one `data: <json>\n\n` frame. A clean stream is closed
//! with an `end` frame; a failing one stops after a single `error` frame.

use crate::adapters::ChunkStream;
use crate::chunk::Chunk;
use async_stream::stream;
use futures_util::{Stream, StreamExt};
use parley_common::{ParleyError, Result};
use serde_json::json;
use std::pin::Pin;
use tracing::{error, warn};

pub type FrameStream = Pin<Box<dyn Stream<Item = String> + Send>>;

pub struct WireEncoder;

impl WireEncoder {
    /// Encode one chunk as a frame
    pub fn encode_frame(chunk: &Chunk) -> Result<String> {
        let body = serde_json::to_string(chunk)
            .map_err(|e| ParleyError::Encoding(format!("{} chunk: {}", chunk.kind(), e)))?;
        Ok(format!("data: {}\n\n", body))
    }

    /// An error frame; never fails
    pub fn error_frame(message: &str) -> String {
        Self::encode_frame(&Chunk::error(message)).unwrap_or_else(|_| {
            format!("data: {}\n\n", json!({"kind": "error", "error": message}))
        })
    }

    pub fn encode(source: ChunkStream) -> FrameStream {
        Box::pin(stream! {
            let mut source = source;
            while let Some(item) = source.next().await {
                let chunk = match item {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!("Chunk stream failed: {}", e);
                        yield Self::error_frame(&e.to_string());
                        return;
                    }
                };
                match Self::encode_frame(&chunk) {
                    Ok(frame) => yield frame,
                    Err(e) => {
                        error!("{}", e);
                        yield Self::error_frame(&e.to_string());
                        return;
                    }
                }
                // An in-band error is the last frame the client sees
                if matches!(chunk, Chunk::Error { .. }) {
                    return;
                }
            }
            yield Self::end_frame();
        })
    }

    fn end_frame() -> String {
        match Self::encode_frame(&Chunk::end()) {
            Ok(frame) => frame,
            Err(e) => Self::error_frame(&e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(items: Vec<Result<Chunk>>) -> ChunkStream {
        Box::pin(futures::stream::iter(items))
    }

    #[tokio::test]
    async fn test_successful_stream_ends_with_end_frame() {
        let frames: Vec<String> = WireEncoder::encode(source(vec![
            Ok(Chunk::content("Hel")),
            Ok(Chunk::content("lo")),
            Ok(Chunk::tokens(7)),
        ]))
        .collect()
        .await;

        assert_eq!(
            frames,
            vec![
                "data: {\"kind\":\"content\",\"content\":\"Hel\"}\n\n",
                "data: {\"kind\":\"content\",\"content\":\"lo\"}\n\n",
                "data: {\"kind\":\"tokens\",\"tokens\":7}\n\n",
                "data: {\"kind\":\"end\"}\n\n",
            ]
        );
    }

    #[tokio::test]
    async fn test_err_item_stops_without_end_frame() {
        let frames: Vec<String> = WireEncoder::encode(source(vec![
            Ok(Chunk::content("a")),
            Err(ParleyError::Upstream("boom".to_string())),
            Ok(Chunk::tokens(1)),
        ]))
        .collect()
        .await;

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], "data: {\"kind\":\"error\",\"error\":\"boom\"}\n\n");
    }

    #[tokio::test]
    async fn test_error_chunk_is_final_frame() {
        let frames: Vec<String> = WireEncoder::encode(source(vec![
            Ok(Chunk::content("par")),
            Ok(Chunk::error("connection reset")),
            Ok(Chunk::tokens(3)),
        ]))
        .collect()
        .await;

        assert_eq!(
            frames,
            vec![
                "data: {\"kind\":\"content\",\"content\":\"par\"}\n\n",
                "data: {\"kind\":\"error\",\"error\":\"connection reset\"}\n\n",
            ]
        );
    }

    #[tokio::test]
    async fn test_lone_error_chunk_has_no_end_frame() {
        let frames: Vec<String> =
            WireEncoder::encode(source(vec![Ok(Chunk::error("quota exceeded"))]))
                .collect()
                .await;

        assert_eq!(
            frames,
            vec!["data: {\"kind\":\"error\",\"error\":\"quota exceeded\"}\n\n"]
        );
    }

    #[test]
    fn test_thought_tokens_frame() {
        let frame = WireEncoder::encode_frame(&Chunk::tokens_with_thoughts(5, 1)).unwrap();
        assert_eq!(
            frame,
            "data: {\"kind\":\"tokens\",\"tokens\":5,\"thoughtTokens\":1}\n\n"
        );
    }
}
