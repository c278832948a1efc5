//! Integration tests for `FlareClient` using wiremock HTTP mocks.

use sunclock_flares::{FlareClient, FlareError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = concat!(
    "<html><body><table>\n",
    r#"<tr><td><a href="flaredetails.aspx?fid=1">2026-10-19 04:12:33</a></td><td align="center">-1.2</td><td align="center">41°</td><td align="center">203° (SSW)</td></tr>"#,
    "\n",
    r#"<tr><td><a href="flaredetails.aspx?fid=2">2026-10-20 18:00:00</a></td><td align="center">-7.9</td><td align="center">22°</td><td align="center">95° (E)</td></tr>"#,
    "\n</table></body></html>\n",
);

fn test_client(server: &MockServer) -> FlareClient {
    FlareClient::new(&format!("{}/iridium.html", server.uri()), "sunclock-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_flares_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iridium.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;

    let flares = test_client(&server)
        .fetch_flares()
        .await
        .expect("should parse flares");

    assert_eq!(flares.len(), 2);
    assert_eq!(flares[0].azimuth_degrees, 203);
    assert_eq!(flares[1].azimuth_degrees, 95);
}

#[tokio::test]
async fn fetch_flares_returns_empty_for_page_without_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iridium.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let flares = test_client(&server).fetch_flares().await.unwrap();
    assert!(flares.is_empty());
}

#[tokio::test]
async fn fetch_flares_reports_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iridium.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_flares().await.unwrap_err();
    assert!(
        matches!(err, FlareError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[test]
fn new_rejects_relative_url() {
    let result = FlareClient::new("iridium.html", "sunclock-test/0.1");
    assert!(
        matches!(result, Err(FlareError::InvalidUrl { .. })),
        "expected InvalidUrl"
    );
}
