//! Fake upstreams and helpers for router tests

use super::auth::{HeaderIdentityResolver, USER_HEADER};
use super::{Adapters, AppState, router};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use parley_common::{AppConfig, ParleyError, Result};
use parley_llm::{AgentRunner, Fragment, FragmentStream, GenerationClient, GenerationRequest};
use parley_memory::{HistoryMessage, InMemoryStore, StoreSet};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Streams fixed words, thoughts first when thinking is requested
pub struct FakeClient {
    pub fail: bool,
}

#[async_trait]
impl GenerationClient for FakeClient {
    async fn generate_stream(&self, request: GenerationRequest) -> Result<FragmentStream> {
        if self.fail {
            return Err(ParleyError::Upstream("upstream unavailable".to_string()));
        }
        let mut fragments = Vec::new();
        if request.config.include_thoughts {
            fragments.push(Ok(Fragment::thought("Hmm")));
        }
        fragments.push(Ok(Fragment::text("Hel")));
        fragments.push(Ok(Fragment::text("lo")));
        Ok(Box::pin(futures_util::stream::iter(fragments)))
    }
}

/// Streams two tokens and returns their concatenation
pub struct FakeRunner;

#[async_trait]
impl AgentRunner for FakeRunner {
    async fn run(
        &self,
        _question: String,
        _history: Vec<HistoryMessage>,
        tokens: mpsc::UnboundedSender<String>,
    ) -> Result<String> {
        let _ = tokens.send("Pro".to_string());
        let _ = tokens.send("cessing".to_string());
        Ok("Processing".to_string())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

pub fn test_app(fail_upstream: bool) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let stores = StoreSet::from_backend(store.clone());
    let mut config = AppConfig::default();
    config.gemini.chunk_delay_ms = 0;

    let adapters = Adapters::new(
        &config,
        Arc::new(FakeClient {
            fail: fail_upstream,
        }),
        Arc::new(FakeRunner),
        &stores,
    );
    let state = AppState::new(stores, Arc::new(HeaderIdentityResolver::default()), adapters);
    TestApp {
        router: router(state),
        store,
    }
}

pub fn json_request(method: &str, uri: &str, user: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
