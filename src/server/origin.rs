//! Cross-origin policy
//!
//! Requests without an `Origin` header (curl, server-side callers) and
//! requests from local development origins are let through. Everything
//! else is rejected before routing, preflights included.

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Which origins may call the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed_prefixes: Vec<String>,
}

impl OriginPolicy {
    pub fn new(allowed_prefixes: Vec<String>) -> Self {
        Self { allowed_prefixes }
    }

    /// Only `http://localhost:<port>` origins
    pub fn local_development() -> Self {
        Self::new(vec!["http://localhost:".to_string()])
    }

    /// Decides on the raw `Origin` header value, if any
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self
                .allowed_prefixes
                .iter()
                .any(|prefix| origin.starts_with(prefix.as_str())),
        }
    }

    fn allows_header(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            None => self.is_allowed(None),
            Some(value) => value
                .to_str()
                .map(|origin| self.is_allowed(Some(origin)))
                .unwrap_or(false),
        }
    }

    /// CORS response headers for allowed origins: GET/POST only,
    /// `Content-Type` and `Authorization` request headers only
    pub fn cors_layer(&self) -> CorsLayer {
        let policy = self.clone();
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| policy.allows_header(Some(origin)),
            ))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::local_development()
    }
}

/// Middleware rejecting requests from disallowed origins with 403
pub async fn reject_disallowed_origin(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    if policy.allows_header(origin) {
        return next.run(request).await;
    }

    tracing::warn!(
        origin = ?origin,
        path = %request.uri().path(),
        "Rejected request from disallowed origin"
    );
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({ "error": "Not allowed by CORS" })),
    )
        .into_response()
}
