use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use presmon_analytics::{GranularityThresholds, LoaderSettings};
use presmon_api::ApiClient;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn loader_for(uri: &str) -> DashboardLoader {
    let client = ApiClient::with_base_url(uri).expect("client");
    DashboardLoader::new(
        client,
        LoaderSettings {
            default_country: "Nigeria".to_string(),
            mock_fallback: true,
            thresholds: GranularityThresholds::default(),
            top_n: 3,
            recent_limit: 20,
        },
    )
}

fn app_with(uri: &str, auth: AuthState, rate_limit: RateLimitState) -> Router {
    build_app(
        AppState {
            loader: Arc::new(loader_for(uri)),
        },
        auth,
        rate_limit,
    )
}

fn app(uri: &str) -> Router {
    let auth = AuthState::from_keys(None, true).expect("auth");
    app_with(uri, auth, default_rate_limit_state())
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json parse")
}

async fn mount_latest_data(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/latest-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [
                {"id": "1", "text": "Rail line commissioned", "date": "2025-03-01",
                 "sentiment": "positive", "score": 0.7, "platform": "twitter"},
                {"id": "2", "text": "Fuel queues in Abuja", "date": "2025-03-03",
                 "sentiment": "negative", "score": -0.6, "platform": "newspaper"},
                {"id": "3", "text": "Budget hearing", "date": "2025-03-03",
                 "score": 0.05, "platform": "television"}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_is_public_and_echoes_request_id() {
    let auth = AuthState::from_keys(Some("secret"), false).expect("auth");
    let app = app_with("http://127.0.0.1:9", auth, default_rate_limit_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-42");
}

#[tokio::test]
async fn dashboard_returns_report_with_fallback_feeds() {
    let server = MockServer::start().await;
    mount_latest_data(&server).await;

    let response = app(&server.uri())
        .oneshot(get_req("/api/v1/dashboard"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["total_loaded"], 3);
    assert_eq!(data["metrics"]["total"], 3);
    assert_eq!(data["timeline"]["granularity"], "day");
    assert_eq!(data["timeline"]["points"].as_array().map(Vec::len), Some(3));
    assert_eq!(data["feeds"][0]["origin"], "live");
    assert_eq!(data["feeds"][1]["origin"], "mock");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn dashboard_responses_are_not_cached_and_compress_on_request() {
    let server = MockServer::start().await;
    mount_latest_data(&server).await;

    let request = Request::builder()
        .uri("/api/v1/dashboard")
        .header("accept-encoding", "gzip")
        .body(Body::empty())
        .expect("request");
    let response = app(&server.uri()).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    assert_eq!(
        response.headers().get("content-encoding").and_then(|v| v.to_str().ok()),
        Some("gzip")
    );
}

#[tokio::test]
async fn metrics_respect_filters() {
    let server = MockServer::start().await;
    mount_latest_data(&server).await;

    let response = app(&server.uri())
        .oneshot(get_req(
            "/api/v1/dashboard/metrics?sentiment=positive,negative&from=2025-03-02",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["negative"], 1);
    assert_eq!(json["data"]["negative_pct"], 100.0);
}

#[tokio::test]
async fn timeline_honours_explicit_granularity() {
    let server = MockServer::start().await;
    mount_latest_data(&server).await;

    let response = app(&server.uri())
        .oneshot(get_req("/api/v1/dashboard/timeline?granularity=month"))
        .await
        .expect("response");

    let json = json_body(response).await;
    assert_eq!(json["data"]["granularity"], "month");
    assert_eq!(json["data"]["points"][0]["label"], "2025-03");
    assert_eq!(json["data"]["points"][0]["total"], 3);
}

#[tokio::test]
async fn invalid_filters_are_rejected() {
    let server = MockServer::start().await;

    for uri in [
        "/api/v1/dashboard?sentiment=ecstatic",
        "/api/v1/dashboard/breakdowns?granularity=hourly",
        "/api/v1/dashboard/metrics?from=yesterday",
    ] {
        let response = app(&server.uri())
            .oneshot(get_req(uri))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn protected_routes_require_bearer_token_when_enabled() {
    let server = MockServer::start().await;
    let auth = AuthState::from_keys(Some("secret"), false).expect("auth");
    let app = app_with(&server.uri(), auth, default_rate_limit_state());

    let denied = app
        .clone()
        .oneshot(get_req("/api/v1/dashboard/policy-impact"))
        .await
        .expect("response");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/dashboard/policy-impact")
                .header("authorization", "Bearer secret")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(allowed.status(), StatusCode::OK);
    let json = json_body(allowed).await;
    assert!(!json["data"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn rate_limit_rejects_requests_over_the_window() {
    let server = MockServer::start().await;
    let auth = AuthState::from_keys(None, true).expect("auth");
    let app = app_with(
        &server.uri(),
        auth,
        RateLimitState::new(1, Duration::from_secs(60)),
    );

    let first = app
        .clone()
        .oneshot(get_req("/api/v1/dashboard/media-sources"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(get_req("/api/v1/dashboard/media-sources"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn feedback_is_forwarded_to_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment-feedback"))
        .and(body_json(json!({"mention_id": "m-1", "corrected_sentiment": "positive"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "thanks"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(post_json(
            "/api/v1/feedback",
            &json!({"mention_id": "m-1", "corrected_sentiment": "positive"}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "success");
    assert_eq!(json["data"]["message"], "thanks");
}

#[tokio::test]
async fn malformed_write_bodies_are_validation_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for (uri, body) in [
        ("/api/v1/feedback", json!({"mention_id": "1"})),
        ("/api/v1/email-config", json!({"recipients": "desk@example.com"})),
        ("/api/v1/target", json!({"keywords": ["x"]})),
    ] {
        let response = app(&server.uri())
            .oneshot(post_json(uri, &body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error", "{uri}");
        assert!(json["meta"]["request_id"].is_string(), "{uri}");
    }

    let missing_content_type = Request::builder()
        .method("POST")
        .uri("/api/v1/feedback")
        .body(Body::from("{}"))
        .expect("request");
    let response = app(&server.uri())
        .oneshot(missing_content_type)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_email_config_is_not_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/email/config"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(post_json(
            "/api/v1/email-config",
            &json!({"recipients": ["not-an-email"], "frequency": "daily", "enabled": true}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn backend_failure_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "target locked"
        })))
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(post_json("/api/v1/target", &json!({"name": "Jane Doe"})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "backend_error");
    assert_eq!(json["error"]["message"], "target locked");
}

#[tokio::test]
async fn trigger_run_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agent/trigger-run"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/agent/trigger-run")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("unauthorized", StatusCode::UNAUTHORIZED),
        ("backend_unavailable", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        assert_eq!(ApiError::new("req-1", code, "x").into_response().status(), status);
    }
}
