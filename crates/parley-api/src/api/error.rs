//! Mapping of errors raised before streaming starts

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_common::ParleyError;
use serde_json::json;
use tracing::error;

pub struct ApiError(pub ParleyError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ParleyError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ParleyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ParleyError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ParleyError> for ApiError {
    fn from(err: ParleyError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
