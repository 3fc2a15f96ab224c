//! Question routes
//!
//! Each route resolves the caller and the session up front, so failures there
//! are plain JSON errors. Once the body starts streaming every failure is
//! reported in-band as an `error` frame.

use super::error::ApiError;
use super::sessions::find_owned_session;
use super::{AdapterKind, AppState};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::post,
};
use futures_util::StreamExt;
use parley_common::truncate_string;
use parley_llm::{FrameStream, WireEncoder};
use serde::Deserialize;
use std::convert::Infallible;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: String,
}

async fn answer(
    state: AppState,
    kind: AdapterKind,
    headers: HeaderMap,
    session_id: String,
    request: QuestionRequest,
) -> Result<Response, ApiError> {
    let user = state.identity.resolve(&headers)?;
    let session = find_owned_session(&state, &session_id, &user).await?;

    let adapter = state.adapters.select(kind);
    info!(
        "Answering '{}' for session {} with {} adapter",
        truncate_string(&request.question, 60),
        session.id,
        adapter.name()
    );

    let chunks = adapter.stream(request.question.clone(), &session);
    let chunks = state.aggregator.wrap(session.id, request.question, chunks);
    Ok(event_stream(WireEncoder::encode(chunks)))
}

fn event_stream(frames: FrameStream) -> Response {
    let body = Body::from_stream(frames.map(Ok::<_, Infallible>));
    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// POST /sessions/:id/questions
pub async fn ask_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<QuestionRequest>,
) -> Result<Response, ApiError> {
    answer(state, AdapterKind::ToolAugmented, headers, id, request).await
}

/// POST /sessions/:id/chat-gemini
pub async fn ask_gemini(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<QuestionRequest>,
) -> Result<Response, ApiError> {
    answer(state, AdapterKind::Standard, headers, id, request).await
}

/// POST /sessions/:id/thinking-chat-gemini
pub async fn ask_thinking_gemini(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<QuestionRequest>,
) -> Result<Response, ApiError> {
    answer(state, AdapterKind::Thinking, headers, id, request).await
}

pub fn question_routes(state: AppState) -> Router {
    Router::new()
        .route("/sessions/:id/questions", post(ask_agent))
        .route("/sessions/:id/chat-gemini", post(ask_gemini))
        .route(
            "/sessions/:id/thinking-chat-gemini",
            post(ask_thinking_gemini),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{body_text, json_request, test_app};
    use axum::http::{StatusCode, header};
    use parley_memory::{HistoryStore, Session, SessionStore};
    use tower::ServiceExt;

    async fn seeded_session(app: &super::super::test_support::TestApp) -> Session {
        let session = Session::new("alice", vec!["en-US".to_string()]).unwrap();
        app.store.save_session(&session).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_gemini_route_streams_frames() {
        let app = test_app(false);
        let session = seeded_session(&app).await;

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/sessions/{}/chat-gemini", session.id),
                Some("alice"),
                r#"{"question":"Hi"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

        let body = body_text(response).await;
        assert_eq!(
            body,
            concat!(
                "data: {\"kind\":\"content\",\"content\":\"Hel\"}\n\n",
                "data: {\"kind\":\"content\",\"content\":\"lo\"}\n\n",
                "data: {\"kind\":\"tokens\",\"tokens\":2}\n\n",
                "data: {\"kind\":\"end\"}\n\n",
            )
        );

        let saved = app.store.questions_for(&session.id).await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].answer, "Hello");
        assert_eq!(app.store.read_history(&session.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_thinking_route_emits_thoughts() {
        let app = test_app(false);
        let session = seeded_session(&app).await;

        let response = app
            .router
            .oneshot(json_request(
                "POST",
                &format!("/sessions/{}/thinking-chat-gemini", session.id),
                Some("alice"),
                r#"{"question":"Hi"}"#,
            ))
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.starts_with("data: {\"kind\":\"thought\",\"content\":\"Hmm\"}\n\n"));
        assert!(body.contains("\"thoughtTokens\":1"));
        assert!(body.ends_with("data: {\"kind\":\"end\"}\n\n"));
    }

    #[tokio::test]
    async fn test_agent_route_uses_weighted_tokens() {
        let app = test_app(false);
        let session = seeded_session(&app).await;

        let response = app
            .router
            .oneshot(json_request(
                "POST",
                &format!("/sessions/{}/questions", session.id),
                Some("alice"),
                r#"{"question":"Do it now please"}"#,
            ))
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains("data: {\"kind\":\"content\",\"content\":\"Pro\"}\n\n"));
        assert!(body.contains("data: {\"kind\":\"tokens\",\"tokens\":3}\n\n"));
        assert_eq!(app.store.questions_for(&session.id).await[0].answer, "Processing");
    }

    #[tokio::test]
    async fn test_missing_question_defaults_to_empty() {
        let app = test_app(false);
        let session = seeded_session(&app).await;

        let response = app
            .router
            .oneshot(json_request(
                "POST",
                &format!("/sessions/{}/chat-gemini", session.id),
                Some("alice"),
                "{}",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.ends_with("data: {\"kind\":\"end\"}\n\n"));

        let saved = app.store.questions_for(&session.id).await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].question, "");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_single_error_frame() {
        let app = test_app(true);
        let session = seeded_session(&app).await;

        let response = app
            .router
            .oneshot(json_request(
                "POST",
                &format!("/sessions/{}/chat-gemini", session.id),
                Some("alice"),
                r#"{"question":"Hi"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "data: {\"kind\":\"error\",\"error\":\"upstream unavailable\"}\n\n"
        );
        assert!(app.store.questions_for(&session.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_or_foreign_session_is_not_found() {
        let app = test_app(false);
        let session = seeded_session(&app).await;

        let foreign = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/sessions/{}/chat-gemini", session.id),
                Some("mallory"),
                r#"{"question":"Hi"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

        let malformed = app
            .router
            .oneshot(json_request(
                "POST",
                "/sessions/not-a-uuid/questions",
                Some("alice"),
                r#"{"question":"Hi"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
        assert!(body_text(malformed).await.contains("not-a-uuid"));
    }
}
