//! HTTP routes for triggering a scrape and reading the snapshot

use crate::model::ProfileSummary;
use crate::scholar::Aggregator;
use crate::server::origin::{reject_disallowed_origin, OriginPolicy};
use crate::storage::{SnapshotStore, StorageError};
use crate::ScholarError;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for HTTP handlers
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub store: Arc<dyn SnapshotStore>,
}

/// Errors surfaced to HTTP callers
#[derive(Debug)]
pub enum ApiError {
    /// The aggregation run failed; nothing was persisted
    Scrape(ScholarError),

    /// The snapshot exists but could not be read
    Read(StorageError),
}

/// Messages of an error and every error beneath it, outermost first
fn error_chain(err: &dyn std::error::Error) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        chain.push(inner.to_string());
        source = inner.source();
    }
    chain
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Scrape(e) => serde_json::json!({
                "error": "Failed to scrape Google Scholar",
                "details": e.to_string(),
            }),
            ApiError::Read(e) => serde_json::json!({
                "error": "Failed to read scholar data",
                "details": e.to_string(),
                "stack": error_chain(e),
            }),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Create the HTTP router
///
/// Routes are also mounted under the `/api/...` names the site used before.
pub fn create_router(state: AppState, policy: OriginPolicy) -> Router {
    let cors = policy.cors_layer();
    let policy = Arc::new(policy);

    Router::new()
        .route("/health", get(health_check))
        .route("/scrape", post(handle_scrape))
        .route("/snapshot", get(handle_snapshot))
        .route("/api/scrape-google-scholar", post(handle_scrape))
        .route("/api/get-scholar-data", get(handle_snapshot))
        .layer(cors)
        .layer(middleware::from_fn_with_state(policy, reject_disallowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "scholar-snapshot",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Runs a full aggregation and returns the new summary
///
/// The run is spawned so a client hanging up does not cancel it halfway.
async fn handle_scrape(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfileSummary>, ApiError> {
    let aggregator = Arc::clone(&state.aggregator);
    let handle = tokio::spawn(async move { aggregator.run().await });

    match handle.await.map_err(ScholarError::from).and_then(|run| run) {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Error scraping Google Scholar: {}", e);
            Err(ApiError::Scrape(e))
        }
    }
}

/// Returns the stored summary, or `{}` when no run has succeeded yet
async fn handle_snapshot(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    match state.store.load().await {
        Ok(Some(summary)) => Ok(Json(summary).into_response()),
        Ok(None) => Ok(Json(serde_json::json!({})).into_response()),
        Err(e) => {
            tracing::error!("Error reading scholar data: {}", e);
            Err(ApiError::Read(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileHeader, Publication};
    use crate::scholar::{AggregationSettings, PageDelay, PublicationSource};
    use crate::storage::{JsonFileStore, MemoryStore};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    /// Two pages of publications, then the end of the list
    struct TwoPageSource {
        fail: bool,
    }

    #[async_trait]
    impl PublicationSource for TwoPageSource {
        async fn fetch_page(&self, offset: usize, _page_size: usize) -> crate::Result<Vec<Publication>> {
            if self.fail {
                return Err(ScholarError::Status {
                    url: "https://scholar.test/citations".to_string(),
                    status: 429,
                });
            }
            let titles: &[&str] = match offset {
                0 => &["Alpha", "Beta"],
                2 => &["Gamma"],
                _ => &[],
            };
            Ok(titles
                .iter()
                .map(|t| Publication {
                    title: t.to_string(),
                    authors: "X Author".to_string(),
                    publication: "Venue".to_string(),
                    year: "2021".to_string(),
                    citation_count: "3".to_string(),
                })
                .collect())
        }

        async fn fetch_profile(&self) -> crate::Result<ProfileHeader> {
            Ok(ProfileHeader {
                name: "X Author".to_string(),
                ..ProfileHeader::default()
            })
        }
    }

    fn router_with(source: TwoPageSource, store: Arc<dyn SnapshotStore>) -> Router {
        let aggregator = Aggregator::new(
            Arc::new(source),
            Arc::clone(&store),
            AggregationSettings {
                page_size: 2,
                max_results: 300,
            },
            PageDelay::None,
        );
        create_router(
            AppState {
                aggregator: Arc::new(aggregator),
                store,
            },
            OriginPolicy::default(),
        )
    }

    fn router() -> Router {
        router_with(TwoPageSource { fail: false }, Arc::new(MemoryStore::new()))
    }

    fn request(method: Method, uri: &str, origin: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_before_any_scrape_is_empty_object() {
        let response = router()
            .oneshot(request(Method::GET, "/snapshot", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_scrape_then_snapshot_round_trip() {
        let app = router();

        let scraped = app
            .clone()
            .oneshot(request(Method::POST, "/scrape", None))
            .await
            .unwrap();
        assert_eq!(scraped.status(), StatusCode::OK);
        let scraped = json_body(scraped).await;
        assert_eq!(scraped["articles"].as_array().unwrap().len(), 3);
        assert_eq!(scraped["name"], "X Author");

        let stored = app
            .oneshot(request(Method::GET, "/snapshot", None))
            .await
            .unwrap();
        assert_eq!(json_body(stored).await, scraped);
    }

    #[tokio::test]
    async fn test_legacy_paths() {
        let app = router();

        let scraped = app
            .clone()
            .oneshot(request(Method::POST, "/api/scrape-google-scholar", None))
            .await
            .unwrap();
        assert_eq!(scraped.status(), StatusCode::OK);

        let stored = app
            .oneshot(request(Method::GET, "/api/get-scholar-data", None))
            .await
            .unwrap();
        assert_eq!(json_body(stored).await["articles"][0]["title"], "Alpha");
    }

    #[tokio::test]
    async fn test_failed_scrape_reports_error_and_keeps_snapshot() {
        let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
        let app = router_with(TwoPageSource { fail: true }, Arc::clone(&store));

        let response = app
            .oneshot(request(Method::POST, "/scrape", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to scrape Google Scholar");
        assert!(body["details"].as_str().unwrap().contains("429"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_snapshot_reports_stack() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scholar_data.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let app = router_with(
            TwoPageSource { fail: false },
            Arc::new(JsonFileStore::new(&path)),
        );

        let response = app
            .oneshot(request(Method::GET, "/snapshot", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to read scholar data");
        assert!(body["details"].is_string());
        assert!(!body["stack"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_localhost_origin_allowed() {
        let response = router()
            .oneshot(request(Method::GET, "/snapshot", Some("http://localhost:4000")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:4000"
        );
    }

    #[tokio::test]
    async fn test_foreign_origin_rejected() {
        let response = router()
            .oneshot(request(Method::GET, "/snapshot", Some("https://evil.example")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_foreign_origin_cannot_trigger_scrape() {
        let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
        let app = router_with(TwoPageSource { fail: false }, Arc::clone(&store));

        let response = app
            .oneshot(request(Method::POST, "/scrape", Some("https://evil.example")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_preflight_from_localhost() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/scrape")
            .header(header::ORIGIN, "http://localhost:4000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("GET"));
        assert!(methods.contains("POST"));
        assert!(!methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_preflight_from_foreign_origin_rejected() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/scrape")
            .header(header::ORIGIN, "https://evil.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();

        assert_eq!(json_body(response).await["status"], "ok");
    }
}
