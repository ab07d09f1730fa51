//! HTTP client for the HR backend service.
//!
//! # Responsibilities
//! - Resolve relative paths against the configured base URL
//! - Forward the caller's bearer token
//! - Send JSON or raw (multipart) bodies
//! - Classify failures: unreachable, rejected, malformed
//!
//! One client is built per process and cloned into request handlers; the
//! underlying connection pool is shared by every clone.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::AuthToken;
use crate::backend::error::BackendError;
use crate::config::BackendConfig;
use crate::observability::metrics;

/// Body attached to a backend call.
#[derive(Debug, Clone)]
pub enum BackendBody {
    /// Pre-serialized JSON document.
    Json(Vec<u8>),
    /// Opaque bytes forwarded with their original content type.
    Raw { content_type: HeaderValue, bytes: Bytes },
}

/// A single call to the backend.
#[derive(Debug, Clone)]
pub struct BackendCall {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<BackendBody>,
    token: Option<AuthToken>,
    strict_json: bool,
}

impl BackendCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
            strict_json: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach the caller's bearer token.
    pub fn bearer(mut self, token: &AuthToken) -> Self {
        self.token = Some(token.clone());
        self
    }

    /// Append a query parameter when a value is present.
    pub fn query_opt(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Append query parameters verbatim, preserving order.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, BackendError> {
        self.body = Some(BackendBody::Json(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Forward `bytes` unmodified under `content_type`.
    pub fn raw(mut self, content_type: HeaderValue, bytes: Bytes) -> Self {
        self.body = Some(BackendBody::Raw {
            content_type,
            bytes,
        });
        self
    }

    /// Require an `application/json` response content type.
    pub fn strict_json(mut self) -> Self {
        self.strict_json = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// Parsed backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Backend HTTP client wrapper.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| BackendError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(BackendError::Client)?;

        tracing::info!(base_url = %base_url, "Backend client initialized");

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a backend path. The base URL's own path is kept as
    /// a prefix.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Perform a call and parse the JSON reply.
    pub async fn send(&self, call: BackendCall) -> Result<BackendResponse, BackendError> {
        let started = Instant::now();
        let url = self.endpoint(&call.path);
        let method_label = call.method.to_string();

        tracing::debug!(method = %call.method, path = %call.path, "Calling backend");

        let mut request = self.http.request(call.method, &url);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(token) = &call.token {
            request = request.bearer_auth(token.as_str());
        }
        request = match call.body {
            Some(BackendBody::Json(bytes)) => request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes),
            Some(BackendBody::Raw {
                content_type,
                bytes,
            }) => request.header(CONTENT_TYPE, content_type).body(bytes),
            None => request,
        };

        let unreachable = |source: reqwest::Error| {
            tracing::warn!(path = %call.path, error = %source, "Backend unreachable");
            metrics::record_backend_failure(&method_label);
            BackendError::Unreachable {
                endpoint: call.path.clone(),
                source,
            }
        };

        let response = request.send().await.map_err(unreachable)?;
        let status = response.status();
        let json_content = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);
        let bytes = response.bytes().await.map_err(unreachable)?;

        metrics::record_backend_call(&method_label, status.as_u16(), started);

        let parsed = parse_body(&bytes);

        if !status.is_success() {
            return Err(match parsed {
                Some(body) => BackendError::Rejected {
                    endpoint: call.path,
                    status,
                    message: error_message(&body),
                },
                None => BackendError::Malformed {
                    endpoint: call.path,
                    status,
                },
            });
        }

        if call.strict_json && !json_content {
            return Err(BackendError::Malformed {
                endpoint: call.path,
                status,
            });
        }

        match parsed {
            Some(body) => Ok(BackendResponse { status, body }),
            None => Err(BackendError::Malformed {
                endpoint: call.path,
                status,
            }),
        }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Empty bodies parse as `null`; anything else must be valid JSON.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Some(Value::Null);
    }
    serde_json::from_slice(bytes).ok()
}

fn is_json_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Caller-facing message carried by a backend error body, if any.
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
