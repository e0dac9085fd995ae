pub mod routes;

pub use routes::{router, ApiState};

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::backend::Session;
use crate::error::JournalError;

impl IntoResponse for JournalError {
    fn into_response(self) -> Response {
        let status = match &self {
            JournalError::Unauthenticated => StatusCode::UNAUTHORIZED,
            JournalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            JournalError::Backend(_) | JournalError::Http(_) | JournalError::Json(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        if status == StatusCode::BAD_GATEWAY {
            warn!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Per-request session from `Authorization: Bearer <token>`.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    if token.is_empty() {
        return None;
    }
    Some(Session::bearer(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_becomes_session() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-1"));
        let s = session_from_headers(&headers).unwrap();
        assert_eq!(s.access_token, "tok-1");
        assert!(s.refresh_token.is_none());
    }

    #[test]
    fn missing_or_malformed_header_is_anonymous() {
        let mut headers = HeaderMap::new();
        assert!(session_from_headers(&headers).is_none());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(session_from_headers(&headers).is_none());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(session_from_headers(&headers).is_none());
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            JournalError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            JournalError::InvalidInput("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            JournalError::Backend("down".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
