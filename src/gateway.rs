use crate::error::StoreError;
use crate::session::{SessionStore, ACCESS_TOKEN_KEY};
use crate::types::Action;
use std::collections::HashMap;

// User agent for all HTTP requests
pub(crate) const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Whether a stored session authorizes a protected request.
///
/// Returned to the caller instead of redirecting as a side effect; the
/// caller owns the navigation decision on `Unauthenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated { token: String },
    Unauthenticated,
}

/// Read the stored token and decide whether a protected request may be
/// issued. An absent token is the sentinel for "no session".
pub fn authorize<S: SessionStore>(store: &S) -> Result<AuthResult, StoreError> {
    match store.get(ACCESS_TOKEN_KEY)? {
        Some(token) => Ok(AuthResult::Authenticated { token }),
        None => Ok(AuthResult::Unauthenticated),
    }
}

pub(crate) fn base_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
    headers
}

/// Build a request carrying `Authorization: Bearer <token>`.
///
/// No retry, refresh, or local expiry check happens here; an expired token
/// is only discovered when the server rejects the request.
pub(crate) fn protected_request(
    url: String,
    method: &str,
    body: Option<String>,
    token: &str,
) -> Action {
    let mut headers = base_headers();
    headers.insert("Authorization".to_string(), format!("Bearer {}", token));

    Action::HttpRequest {
        url,
        method: method.to_string(),
        headers,
        body,
    }
}

/// Build an unauthenticated request (login, registration, checks).
pub(crate) fn public_request(url: String, method: &str, body: Option<String>) -> Action {
    Action::HttpRequest {
        url,
        method: method.to_string(),
        headers: base_headers(),
        body,
    }
}
