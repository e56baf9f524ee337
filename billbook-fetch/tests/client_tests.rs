//! Request client tests against a mock API server.

use std::time::{Duration, Instant};

use billbook_fetch::{
    endpoints, ApiClient, ClientSettings, Credentials, HttpMethod, RequestError, RetryPolicy,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_DELAY: Duration = Duration::from_millis(50);

fn credentials() -> Credentials {
    Credentials::new("Bearer test-token", "sid=abc", "company-7")
}

fn client_for(server: &MockServer, retry: RetryPolicy) -> ApiClient {
    let settings = ClientSettings::new(server.uri())
        .with_timeout(Duration::from_secs(5))
        .with_retry(retry);
    ApiClient::new(settings, &credentials()).unwrap()
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries).with_base_delay(BASE_DELAY)
}

#[tokio::test]
async fn test_success_returns_json_and_sends_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::BULK_UPLOAD_STATUS))
        .and(header("authorization", "Bearer test-token"))
        .and(header("cookie", "sid=abc"))
        .and(header("company-id", "company-7"))
        .and(header("client", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(3));
    let value = client.probe().await.unwrap();
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client.probe().await.unwrap_err();
    assert!(matches!(err, RequestError::AuthenticationFailure));
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_rate_limit_backs_off_linearly_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::ITEMS))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(endpoints::ITEMS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_count": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(3));
    let start = Instant::now();
    let value = client.list_items(1, 500).await.unwrap();

    assert_eq!(value["total_count"], 0);
    // base * 1 + base * 2
    assert!(start.elapsed() >= BASE_DELAY * 3, "elapsed {:?}", start.elapsed());
}

#[tokio::test]
async fn test_rate_limit_gives_up_at_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(2));
    let err = client.list_items(1, 500).await.unwrap_err();
    assert!(matches!(err, RequestError::RateLimited { attempts: 3 }));
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client.items_stats().await.unwrap_err();
    match err {
        RequestError::ServerRejected { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance window");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client.probe().await.unwrap_err();
    assert!(matches!(err, RequestError::TransportFailure(_)));
}

#[tokio::test]
async fn test_connection_refused_retries_then_fails() {
    // Nothing listens on the discard port.
    let settings = ClientSettings::new("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2))
        .with_retry(RetryPolicy::new(1).with_base_delay(Duration::from_millis(10)));
    let client = ApiClient::new(settings, &credentials()).unwrap();

    let err = client.probe().await.unwrap_err();
    assert!(matches!(err, RequestError::TransportFailure(_)));
    assert!(!client.test_connection().await);
}

#[tokio::test]
async fn test_timeout_is_retried_after_fixed_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::ITEMS_STATS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": 1}))
                .set_delay(Duration::from_millis(800)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(endpoints::ITEMS_STATS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(200);
    let settings = ClientSettings::new(server.uri())
        .with_timeout(timeout)
        .with_retry(fast_retry(2));
    let client = ApiClient::new(settings, &credentials()).unwrap();

    let start = Instant::now();
    let value = client.items_stats().await.unwrap();

    assert_eq!(value["ok"], 2);
    // timed-out first attempt plus one fixed base delay
    assert!(start.elapsed() >= timeout + BASE_DELAY, "elapsed {:?}", start.elapsed());
}

#[tokio::test]
async fn test_listing_sends_paging_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::ITEMS))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"inventory_items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(0));
    client.list_items(1, 250).await.unwrap();
}

#[tokio::test]
async fn test_bulk_upload_status_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::BULK_UPLOAD_STATUS))
        .and(query_param("upload_type", "item"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upload_status": "done"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(0));
    let value = client.bulk_upload_status().await.unwrap();
    assert_eq!(value["upload_status"], "done");
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    let payload = json!({"name": "Ring"});
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "it-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(0));
    let value = client
        .execute("/items", HttpMethod::Post, None, Some(&payload))
        .await
        .unwrap();
    assert_eq!(value["id"], "it-1");
}
