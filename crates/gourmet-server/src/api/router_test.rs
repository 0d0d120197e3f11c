use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use gourmet_hotpepper::ClientOptions;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn app_for(base_url: &str, api_key: Option<&str>) -> Router {
    let options = ClientOptions {
        base_url: base_url.to_owned(),
        timeout: Duration::from_secs(5),
        max_retries: 1,
        retry_delay: Duration::ZERO,
        user_agent: "gourmet-test/0.1".to_owned(),
    };
    let client = HotpepperClient::new(api_key, &options).expect("client");
    build_app(AppState { client }, AccessLog { enabled: false })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}

fn results(inner: Value) -> Value {
    json!({ "results": inner })
}

#[test]
fn upstream_status_prefers_reported_status() {
    let error = ApiError::new(ErrorCode::UpstreamError, "boom").with_status(503);
    assert_eq!(upstream_status(&error), StatusCode::SERVICE_UNAVAILABLE);
    let error = ApiError::new(ErrorCode::NetworkError, "down");
    assert_eq!(upstream_status(&error), StatusCode::BAD_GATEWAY);
}

#[test]
fn failure_validation_maps_to_bad_request() {
    let req_id = RequestId("req-1".to_owned());
    let response = Failure::validation(&req_id, ApiError::validation("bad")).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_key_configuration() {
    let (status, body) = get(app_for("http://127.0.0.1:1", Some("k")), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "data": {"status": "ok", "hotpepperConfigured": true}})
    );

    let (_, body) = get(app_for("http://127.0.0.1:1", None), "/api/health").await;
    assert_eq!(body["data"]["hotpepperConfigured"], false);
}

#[tokio::test]
async fn search_returns_transformed_shops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gourmet/v1/"))
        .and(query_param("keyword", "ramen"))
        .and(query_param("start", "11"))
        .and(query_param("count", "10"))
        .and(query_param("order", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 42,
            "results_returned": "1",
            "results_start": 11,
            "shop": [{
                "id": "J001",
                "name": "Ramen Ichiban",
                "lat": "35.6581",
                "lng": 139.7017,
                "urls": {"pc": "https://www.hotpepper.jp/strJ001/"}
            }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(
        app_for(&server.uri(), Some("k")),
        "/api/hp/shops/search?q=%20%20ramen%20&page=2&perPage=10",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 42);
    assert_eq!(body["data"]["start"], 11);
    assert_eq!(body["data"]["shops"][0]["lat"], 35.6581);
    assert_eq!(
        body["data"]["shops"][0]["urlPc"],
        "https://www.hotpepper.jp/strJ001/"
    );
}

#[tokio::test]
async fn search_accepts_repeated_genre_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gourmet/v1/"))
        .and(query_param("genre", "G001,G002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 0, "results_returned": "0", "results_start": 1
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(
        app_for(&server.uri(), Some("k")),
        "/api/hp/shops/search?genres%5B%5D=G001&genres%5B%5D=G002&genres=G003",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shops"], json!([]));
}

#[tokio::test]
async fn search_rejects_lat_without_lng() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(
        app_for(&server.uri(), Some("k")),
        "/api/hp/shops/search?lat=35.6",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn upstream_server_error_passes_status_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/genres").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert_eq!(body["error"]["statusCode"], 503);
    assert!(!body.to_string().contains("key=k"), "key leaked: {body}");
}

#[tokio::test]
async fn missing_key_maps_to_bad_gateway() {
    let (status, body) = get(app_for("http://127.0.0.1:1", None), "/api/hp/areas/large").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "CONFIG_ERROR");
}

#[tokio::test]
async fn shop_detail_returns_shop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("id", "J001"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 1,
            "results_returned": "1",
            "results_start": 1,
            "shop": [{"id": "J001", "name": "Yakitori", "mobile_access": "2 min", "capacity": "30"}]
        }))))
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/shops/J001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shop"]["id"], "J001");
    assert_eq!(body["data"]["shop"]["access"], "2 min");
    assert_eq!(body["data"]["shop"]["capacity"], 30.0);
}

#[tokio::test]
async fn shop_detail_empty_result_is_not_found_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 0, "results_returned": "0", "results_start": 1
        }))))
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/shops/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": true, "data": {"notFound": true}}));
}

#[tokio::test]
async fn shop_detail_upstream_404_is_not_found_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/shops/GONE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["notFound"], true);
}

#[tokio::test]
async fn shop_detail_rejects_blank_id() {
    let (status, body) = get(app_for("http://127.0.0.1:1", Some("k")), "/api/hp/shops/%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn shop_detail_undecodable_id_is_a_json_validation_failure() {
    let (status, body) = get(app_for("http://127.0.0.1:1", Some("k")), "/api/hp/shops/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn search_keeps_shops_with_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gourmet/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 2, "results_returned": 2, "results_start": 1,
            "shop": [{"id": "J001", "name": "A"}, {"id": "J002"}]
        }))))
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/shops/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shops"][1]["id"], "J002");
    assert_eq!(body["data"]["shops"][1]["name"], "");
}

#[tokio::test]
async fn genres_tolerate_entries_without_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 1, "results_returned": "1", "results_start": 1,
            "genre": [{"name": "Izakaya"}]
        }))))
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["genres"][0]["name"], "Izakaya");
}

#[tokio::test]
async fn genres_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 1, "results_returned": "1", "results_start": 1,
            "genre": [{"code": "G001", "name": "Izakaya"}]
        }))))
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["genres"], json!([{"code": "G001", "name": "Izakaya"}]));
}

#[tokio::test]
async fn middle_areas_without_parent_are_empty_and_skip_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(app_for(&server.uri(), Some("k")), "/api/hp/areas/middle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["areas"], json!([]));
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn middle_areas_with_parent_include_parent_large() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/middle_area/v1/"))
        .and(query_param("large_area", "Z011"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "results_available": 1, "results_returned": "1", "results_start": 1,
            "middle_area": [{"code": "Y005", "name": "Ginza", "large_area": {"code": "Z011", "name": "Tokyo"}}]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(
        app_for(&server.uri(), Some("k")),
        "/api/hp/areas/middle?largeAreaCode=Z011",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["areas"][0]["parentLarge"]["code"], "Z011");
}

#[tokio::test]
async fn small_areas_require_middle_code() {
    let (status, body) = get(app_for("http://127.0.0.1:1", Some("k")), "/api/hp/areas/small").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "middleAreaCode is required");
}

#[tokio::test]
async fn small_areas_reject_overlong_code() {
    let (status, body) = get(
        app_for("http://127.0.0.1:1", Some("k")),
        "/api/hp/areas/small?middleAreaCode=ABCDEFGHIJKLMNOPQ",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["field"], "middleAreaCode");
}

#[tokio::test]
async fn responses_echo_request_id() {
    let response = app_for("http://127.0.0.1:1", Some("k"))
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
