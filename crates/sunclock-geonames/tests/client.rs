//! Integration tests for `GeonamesClient` using wiremock HTTP mocks.

use sunclock_geonames::{GeonamesClient, GeonamesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeonamesClient {
    GeonamesClient::with_base_url("demo", "sunclock-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn find_nearby_place_returns_first_result() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "geonames": [{
            "toponymName": "Seattle",
            "name": "Seattle",
            "distance": "0.41337",
            "adminName1": "Washington",
            "countryName": "United States",
            "lat": "47.60621",
            "lng": "-122.33207"
        }]
    });

    Mock::given(method("GET"))
        .and(path("/findNearbyPlaceNameJSON"))
        .and(query_param("lat", "47.6062"))
        .and(query_param("lng", "-122.3321"))
        .and(query_param("maxRows", "1"))
        .and(query_param("username", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let place = client
        .find_nearby_place(47.6062, -122.3321)
        .await
        .expect("should parse place");

    assert_eq!(place.toponym_name, "Seattle");
    assert_eq!(place.distance, "0.41337");
    assert_eq!(place.admin_name1.as_deref(), Some("Washington"));
    assert_eq!(place.country_name.as_deref(), Some("United States"));
}

#[tokio::test]
async fn find_nearby_place_surfaces_api_status() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": {
            "message": "the daily limit of 20000 credits for demo has been exceeded",
            "value": 18
        }
    });

    Mock::given(method("GET"))
        .and(path("/findNearbyPlaceNameJSON"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .find_nearby_place(1.0, 2.0)
        .await
        .unwrap_err();
    assert!(
        matches!(err, GeonamesError::ApiError { code: 18, .. }),
        "expected ApiError(18), got: {err:?}"
    );
}

#[tokio::test]
async fn find_nearby_place_with_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findNearbyPlaceNameJSON"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&serde_json::json!({"geonames": []})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .find_nearby_place(0.0, -160.0)
        .await
        .unwrap_err();
    assert!(
        matches!(err, GeonamesError::NoResult(..)),
        "expected NoResult, got: {err:?}"
    );
}

#[tokio::test]
async fn find_nearby_place_with_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findNearbyPlaceNameJSON"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .find_nearby_place(1.0, 2.0)
        .await
        .unwrap_err();
    assert!(
        matches!(err, GeonamesError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn find_nearby_place_with_server_error_hides_username() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findNearbyPlaceNameJSON"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .find_nearby_place(1.0, 2.0)
        .await
        .unwrap_err();
    match err {
        GeonamesError::UnexpectedStatus { status, url } => {
            assert_eq!(status, 500);
            assert!(!url.contains("username=demo"), "{url}");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn find_nearby_place_rejects_out_of_range_coordinates() {
    let client = test_client("http://127.0.0.1:9");
    let err = client.find_nearby_place(91.0, 0.0).await.unwrap_err();
    assert!(
        matches!(err, GeonamesError::InvalidCoordinates(..)),
        "expected InvalidCoordinates, got: {err:?}"
    );
}
