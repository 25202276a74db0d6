//! End-to-end dashboard loading against a mocked backend.

use presmon_analytics::{
    DashboardLoader, DataOrigin, Granularity, GranularityThresholds, LoaderSettings,
    MentionFilter,
};
use presmon_api::ApiClient;
use presmon_core::{BiasLevel, SentimentLabel};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(mock_fallback: bool) -> LoaderSettings {
    LoaderSettings {
        default_country: "Nigeria".to_string(),
        mock_fallback,
        thresholds: GranularityThresholds::default(),
        top_n: 3,
        recent_limit: 10,
    }
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_combines_live_feeds_and_fallbacks() {
    let server = MockServer::start().await;

    mount_json(
        &server,
        "/latest-data",
        json!({
            "status": "success",
            "data": [
                {"id": "1", "text": "Rail line commissioned in Lagos", "date": "2025-03-01T08:00:00Z",
                 "sentiment": "positive", "sentiment_score": 0.7, "platform": "twitter", "source": "@StateHouseNG"},
                {"id": "2", "text": "Fuel queues in Abuja", "date": "2025-03-02T08:00:00Z",
                 "sentiment": "negative", "sentiment_score": -0.5, "source": "Punch Newspapers"},
                {"id": "3", "text": "Budget hearing continues", "date": "not a date",
                 "sentiment_score": 0.1, "source": "Channels TV"}
            ]
        }),
    )
    .await;
    mount_json(
        &server,
        "/media-sources/newspapers",
        json!({"status": "success", "data": [{"name": "Punch", "sentiment_score": -0.4, "mentions": 12}]}),
    )
    .await;
    mount_json(&server, "/media-sources/television", json!({"status": "success", "data": []})).await;
    mount_json(&server, "/media-sources/facebook", json!({"status": "success", "data": []})).await;
    Mock::given(method("GET"))
        .and(path("/media-sources/twitter"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_json(
        &server,
        "/policy-impact",
        json!({"status": "success", "data": {"items": [{"policy": "Fuel subsidy removal", "impact_score": -0.6}]}}),
    )
    .await;

    let client = ApiClient::with_base_url(&server.uri()).unwrap();
    let loader = DashboardLoader::new(client, settings(true));
    let report = loader.load(MentionFilter::default(), None).await;

    assert_eq!(report.total_loaded, 3);
    assert_eq!(report.metrics.positive, 1);
    assert_eq!(report.metrics.negative, 1);
    assert_eq!(report.metrics.neutral, 1);
    assert_eq!(report.inference.dates, 1);

    let origin = |feed: &str| {
        report
            .feeds
            .iter()
            .find(|f| f.feed == feed)
            .map(|f| f.origin)
    };
    assert_eq!(origin("latest_data"), Some(DataOrigin::Live));
    assert_eq!(origin("media_sources/twitter"), Some(DataOrigin::Mock));
    assert_eq!(origin("media_sources/television"), Some(DataOrigin::Live));

    let punch = report
        .media_sources
        .iter()
        .find(|s| s.name == "Punch")
        .unwrap();
    assert_eq!(punch.bias, BiasLevel::Critical);
    assert_eq!(report.policy_impact[0].sentiment, SentimentLabel::Negative);
}

#[tokio::test]
async fn unreachable_backend_without_fallback_yields_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri()).unwrap();
    let loader = DashboardLoader::new(client, settings(false));
    let report = loader
        .load(MentionFilter::default(), Some(Granularity::Month))
        .await;

    assert_eq!(report.feeds.len(), 6);
    assert!(report.feeds.iter().all(|f| f.origin == DataOrigin::Empty));
    assert_eq!(report.metrics.total, 0);
    assert_eq!(report.timeline.granularity, Granularity::Month);
    assert!(report.timeline.points.is_empty());
}
