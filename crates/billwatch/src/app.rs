use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::{cache_stats, invalidate_cache},
        bills::{get_bill, get_widget_bill},
        health::{healthz, livez},
    },
    state::AppState,
};

/// Upper bound on a whole request, including queued upstream retries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/bills/{*id}", get(get_bill))
        .route("/widget/bills/{*id}", get(get_widget_bill))
        .route("/admin/cache/invalidate", post(invalidate_cache))
        .route("/admin/cache/stats", get(cache_stats))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::{harness, Harness, MockSource};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use billwatch_core::upstream::{SummaryError, UpstreamError};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(h: &Harness) -> Router {
        create_app(AppState::new(h.engine.clone()))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = get(app_with(&h), "/livez").await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_store_stats() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = get(app_with(&h), "/healthz").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["bill_entries"], 0);
    }

    #[tokio::test]
    async fn test_get_bill_without_summary() {
        let h = harness(MockSource::with_status("Passed Assembly"));

        let response = get(app_with(&h), "/api/bills/AB-123").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["bill"]["id"], "AB-123");
        assert_eq!(json["bill"]["status"], "Passed Assembly");
        assert!(json["summary"].is_null());
        assert_eq!(json["summary_unavailable"], false);
        assert_eq!(json["stale"], false);
        assert_eq!(h.summarizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_bill_with_summary() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = get(app_with(&h), "/api/bills/AB-123?summary=true").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["summary"]["text"], "Summary of An act relating to housing");
        assert_eq!(json["summary"]["source_hash"], json["bill"]["source_hash"]);
    }

    #[tokio::test]
    async fn test_get_bill_with_ocd_id() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = get(app_with(&h), "/api/bills/ocd-bill/0e3c4b2a").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["bill"]["id"], "ocd-bill/0e3c4b2a");
    }

    #[tokio::test]
    async fn test_widget_always_includes_summary() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = get(app_with(&h), "/api/widget/bills/AB-123").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["summary"].is_object());
        assert_eq!(h.summarizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_summary_failure_flags_response() {
        let h = harness(MockSource::with_status("Introduced"));
        h.summarizer
            .fail_with(Some(SummaryError::InvalidInput("empty".to_string())));

        let response = get(app_with(&h), "/api/widget/bills/AB-123").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["summary"].is_null());
        assert_eq!(json["summary_unavailable"], true);
    }

    #[tokio::test]
    async fn test_unknown_bill_is_404() {
        let h = harness(MockSource::failing(UpstreamError::NotFound));

        let response = get(app_with(&h), "/api/bills/AB-999").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "upstream_not_found");
    }

    #[tokio::test]
    async fn test_invalid_bill_id_is_400() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = get(app_with(&h), "/api/bills/AB%20123").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "invalid_bill_id");
        assert_eq!(h.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_unavailable_is_503_with_retry_after() {
        let h = harness(MockSource::failing(UpstreamError::Unavailable(
            "HTTP 502".to_string(),
        )));

        let response = get(app_with(&h), "/api/bills/AB-123").await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "30");
    }

    #[tokio::test]
    async fn test_invalidate_then_refetch() {
        let h = harness(MockSource::with_status("Introduced"));
        let app = app_with(&h);

        get(app.clone(), "/api/bills/AB-123").await;
        let response = post_json(
            app.clone(),
            "/api/admin/cache/invalidate",
            serde_json::json!({ "scope": { "type": "bill", "id": "AB-123" } }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["bills_removed"], 1);
        assert_eq!(report["summaries_removed"], 0);

        get(app, "/api/bills/AB-123").await;
        assert_eq!(h.source.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_rejects_malformed_body() {
        let h = harness(MockSource::with_status("Introduced"));

        let response = post_json(
            app_with(&h),
            "/api/admin/cache/invalidate",
            serde_json::json!({ "scope": { "type": "everything" } }),
        )
        .await;

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let h = harness(MockSource::with_status("Introduced"));
        let app = app_with(&h);

        get(app.clone(), "/api/bills/AB-1?summary=true").await;
        get(app.clone(), "/api/bills/AB-2").await;
        let response = get(app, "/api/admin/cache/stats").await;

        assert_eq!(response.status(), StatusCode::OK);
        let stats = body_json(response).await;
        assert_eq!(stats["bill_entries"], 2);
        assert_eq!(stats["summary_entries"], 1);
        assert_eq!(stats["fresh_bills"], 2);
        assert_eq!(stats["oldest_entry_age_seconds"], 0);
        assert_eq!(stats["in_flight_bill_fetches"], 0);
    }
}
