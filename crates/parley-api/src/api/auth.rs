//! Caller identity resolution

use axum::http::HeaderMap;
use parley_common::{ParleyError, Result};

/// Default header carrying the caller identity
pub const USER_HEADER: &str = "x-user-id";

/// Maps request headers to a user identity
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<String>;
}

/// Trusts an identity header set by a fronting proxy
pub struct HeaderIdentityResolver {
    header: String,
}

impl HeaderIdentityResolver {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Default for HeaderIdentityResolver {
    fn default() -> Self {
        Self::new(USER_HEADER)
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<String> {
        headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ParleyError::Auth(format!("missing {} header", self.header)))
    }
}
