//! Bearer token extraction.
//!
//! Tokens are opaque to the gateway. They are pulled from the
//! `Authorization` header and forwarded to the backend, which owns
//! signature and expiry checks.

use std::convert::Infallible;
use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::http::error::ApiError;

/// Opaque bearer credential taken from the inbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, token) = header.trim().split_once(' ')?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return None;
        }
        Some(Self(token.to_string()))
    }

    /// Read the token from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("No authorization token provided".into()))?;

        value
            .to_str()
            .ok()
            .and_then(Self::parse)
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

/// Token for routes that work with or without a caller identity.
#[derive(Debug, Clone)]
pub struct OptionalAuthToken(pub Option<AuthToken>);

impl<S> FromRequestParts<S> for OptionalAuthToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(AuthToken::from_headers(&parts.headers).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn parses_bearer_scheme() {
        let token = AuthToken::parse("Bearer abc.def.ghi").unwrap();
        assert_eq!(token.as_str(), "abc.def.ghi");
        assert!(AuthToken::parse("bearer  xyz ").is_some());
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert!(AuthToken::parse("Basic dXNlcjpwYXNz").is_none());
        assert!(AuthToken::parse("Bearer ").is_none());
        assert!(AuthToken::parse("abc").is_none());
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = AuthToken::from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn debug_does_not_leak_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret-value"));
        let token = AuthToken::from_headers(&headers).unwrap();
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
    }
}
