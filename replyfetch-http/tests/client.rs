use replyfetch_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn sends_query_and_header_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/replies"))
        .and(query_param("tweetId", "42"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"tweets":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let resp = client
        .get(
            &format!("{}/replies", server.uri()),
            RequestOpts {
                auth: Some(Auth::header("X-API-Key", "secret").unwrap()),
                query: Some(vec![("tweetId", "42".into())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(resp.status.is_success());
    let v: serde_json::Value = resp.json().unwrap();
    assert_eq!(v["tweets"], serde_json::json!([]));
}

#[tokio::test]
async fn error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"unauthorized"}"#))
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let resp = client.get(&server.uri(), RequestOpts::default()).await.unwrap();

    assert_eq!(resp.status.as_u16(), 401);
    assert!(resp.text().contains("unauthorized"));
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = HttpClient::new()
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = client
        .get(&server.uri(), RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout { .. }), "got {err:?}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn unparseable_url_is_a_transport_error() {
    let client = HttpClient::new().unwrap();
    let err = client.get("", RequestOpts::default()).await.unwrap_err();

    assert!(matches!(err, HttpError::Url(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn configured_timeout_bounds_the_connect_phase() {
    // Non-routable address: the TCP handshake never completes.
    let client = HttpClient::new()
        .unwrap()
        .with_timeout(Duration::from_millis(300));
    let started = std::time::Instant::now();
    let err = client
        .get("http://10.255.255.1:81/replies", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(err.is_transport(), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
}
