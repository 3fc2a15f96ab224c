use super::AppState;
use super::error::ApiError;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use parley_common::ParleyError;
use parley_memory::{NewSession, Session};
use tracing::info;
use uuid::Uuid;

/// POST /sessions
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewSession>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let user = state.identity.resolve(&headers)?;
    let session = Session::new(user, body.locales)?;

    state.stores.sessions.save_session(&session).await?;
    if let Some(message) = session.locale_message() {
        state
            .stores
            .history
            .append_history(&session.id, message)
            .await?;
    }

    info!(
        "Created session {} for {} ({:?})",
        session.id,
        session.user,
        session.primary_locale()
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// Look up a session owned by `user`; anything else reads as not found
pub async fn find_owned_session(
    state: &AppState,
    raw_id: &str,
    user: &str,
) -> Result<Session, ApiError> {
    let not_found = || ParleyError::SessionNotFound(raw_id.to_string());

    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    match state.stores.sessions.find_session(&id).await? {
        Some(session) if session.is_owned_by(user) => Ok(session),
        _ => Err(not_found().into()),
    }
}

pub fn session_routes(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .with_state(state)
}
