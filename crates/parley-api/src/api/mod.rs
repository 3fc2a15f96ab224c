//! HTTP routes of the session gateway

pub mod auth;
pub mod error;
pub mod health;
pub mod questions;
pub mod sessions;

#[cfg(test)]
mod test_support;

use auth::IdentityResolver;
use axum::Router;
use parley_common::AppConfig;
use parley_llm::{
    AgentAdapter, AgentRunner, GeminiAdapter, GeminiMode, GenerationClient, ProviderAdapter,
    ResponseAggregator,
};
use parley_memory::StoreSet;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Which upstream strategy a question route uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Standard,
    Thinking,
    ToolAugmented,
}

/// One adapter per route, built once at startup
pub struct Adapters {
    standard: ProviderAdapter,
    thinking: ProviderAdapter,
    agent: ProviderAdapter,
}

impl Adapters {
    pub fn new(
        config: &AppConfig,
        client: Arc<dyn GenerationClient>,
        runner: Arc<dyn AgentRunner>,
        stores: &StoreSet,
    ) -> Self {
        let gemini = Arc::new(config.gemini.clone());
        Self {
            standard: ProviderAdapter::Gemini(GeminiAdapter::new(
                client.clone(),
                stores.history.clone(),
                gemini.clone(),
                GeminiMode::Standard,
            )),
            thinking: ProviderAdapter::Gemini(GeminiAdapter::new(
                client,
                stores.history.clone(),
                gemini,
                GeminiMode::Thinking,
            )),
            agent: ProviderAdapter::ToolAugmented(AgentAdapter::new(
                runner,
                stores.history.clone(),
            )),
        }
    }

    pub fn select(&self, kind: AdapterKind) -> &ProviderAdapter {
        match kind {
            AdapterKind::Standard => &self.standard,
            AdapterKind::Thinking => &self.thinking,
            AdapterKind::ToolAugmented => &self.agent,
        }
    }
}

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub stores: StoreSet,
    pub identity: Arc<dyn IdentityResolver>,
    pub adapters: Arc<Adapters>,
    pub aggregator: ResponseAggregator,
}

impl AppState {
    pub fn new(stores: StoreSet, identity: Arc<dyn IdentityResolver>, adapters: Adapters) -> Self {
        let aggregator = ResponseAggregator::new(stores.questions.clone());
        Self {
            stores,
            identity,
            adapters: Arc::new(adapters),
            aggregator,
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::health_routes())
        .merge(sessions::session_routes(state.clone()))
        .merge(questions::question_routes(state))
        .layer(TraceLayer::new_for_http())
}
