//! Request metadata extraction.
//!
//! The extractor only parses headers; it performs no authentication. The
//! guard decides what to do with the resulting [`RequestContext`], which
//! keeps the CSRF check ahead of any identity-provider call.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

use crate::crypto::SecretString;
use crate::guard::RequestContext;

/// Pulls the bearer token out of the `Authorization` header, if any.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Raw per-request metadata: origin, referrer, and the session token.
/// Infallible; every request gets one.
#[derive(Debug, Clone)]
pub struct RequestMeta(pub RequestContext);

impl RequestMeta {
    pub fn into_context(self) -> RequestContext {
        self.0
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_string = |name: header::HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(ToOwned::to_owned)
        };

        Ok(RequestMeta(RequestContext {
            origin: header_string(header::ORIGIN),
            referer: header_string(header::REFERER),
            session_token: extract_bearer_token(&parts.headers).map(SecretString::new),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer session-token-123"),
        );
        assert_eq!(
            extract_bearer_token(&headers).as_deref(),
            Some("session-token-123")
        );
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
