use serde_json::json;

use super::*;

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url).expect("client construction should not fail")
}

#[test]
fn endpoint_appends_to_base_path() {
    let client = test_client("https://backend.example.com/api");
    let url = client.endpoint("latest-data").unwrap();
    assert_eq!(url.as_str(), "https://backend.example.com/api/latest-data");
}

#[test]
fn endpoint_tolerates_trailing_and_leading_slashes() {
    let client = test_client("https://backend.example.com/api/");
    let url = client.endpoint("/media-sources/twitter").unwrap();
    assert_eq!(
        url.as_str(),
        "https://backend.example.com/api/media-sources/twitter"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ApiClient::with_base_url("not a url").unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
}

#[test]
fn debug_redacts_token() {
    let mut config = ApiClientConfig::for_base_url("https://backend.example.com");
    config.token = Some("very-secret".to_string());
    let client = ApiClient::new(&config).unwrap();
    assert!(!format!("{client:?}").contains("very-secret"));
    assert!(!format!("{config:?}").contains("very-secret"));
}

#[test]
fn extract_rows_accepts_bare_array() {
    let rows = extract_rows(json!([{"id": 1}, {"id": 2}]), "test").unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn extract_rows_missing_data_is_empty() {
    let rows = extract_rows(json!({"status": "success"}), "test").unwrap();
    assert!(rows.is_empty());
    let rows = extract_rows(Value::Null, "test").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn extract_rows_unwraps_nested_items() {
    let rows = extract_rows(
        json!({"status": "success", "data": {"items": [{"id": 1}], "total": 1}}),
        "test",
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn extract_rows_rejects_scalar_data() {
    let err = extract_rows(json!({"status": "success", "data": 7}), "test").unwrap_err();
    assert!(matches!(err, ApiError::Deserialize { .. }));
}

#[test]
fn extract_rows_surfaces_backend_error() {
    let err = extract_rows(json!({"status": "error", "message": "quota"}), "test").unwrap_err();
    assert!(matches!(err, ApiError::Backend(ref m) if m == "quota"));
}
