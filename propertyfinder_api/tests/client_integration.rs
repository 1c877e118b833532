use std::time::Duration;

use propertyfinder_api::{Client, Error, FailureKind, RetryPolicy};
use wiremock::matchers::{header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_client(max_attempts: u32) -> Client {
    Client::with_policy(
        RetryPolicy::new(max_attempts, Duration::from_millis(1)),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn fetch_returns_body_with_browser_headers() {
    let mock_server = MockServer::start().await;
    let referer = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/en/search"))
        .and(query_param("page", "1"))
        .and(header("referer", referer.as_str()))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .and(header_regex("user-agent", "Chrome/132"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(5);
    let url = format!("{}/en/search?c=1&page=1", mock_server.uri());
    let body = client.fetch(&url).await.unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetch_retries_server_errors_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plp/1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/plp/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("detail"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(5);
    let body = client
        .fetch(&format!("{}/plp/1", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "detail");
}

#[tokio::test]
async fn fetch_gives_up_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(5)
        .mount(&mock_server)
        .await;

    let client = fast_client(5);
    let result = client.fetch(&format!("{}/plp/2", mock_server.uri())).await;

    match result {
        Err(Error::RetriesExhausted { attempts, last, url }) => {
            assert_eq!(attempts, 5);
            assert_eq!(last, FailureKind::HttpStatus(500));
            assert!(url.ends_with("/plp/2"));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_classifies_timeouts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_policy(
        RetryPolicy::new(2, Duration::from_millis(1)),
        Duration::from_millis(50),
    )
    .unwrap();
    let result = client.fetch(&format!("{}/slow", mock_server.uri())).await;

    assert!(matches!(
        result,
        Err(Error::RetriesExhausted {
            attempts: 2,
            last: FailureKind::Timeout,
            ..
        })
    ));
}

#[tokio::test]
async fn fetch_rejects_invalid_url_without_retrying() {
    let client = fast_client(5);
    let result = client.fetch("not a url").await;
    assert!(matches!(result, Err(Error::InvalidUrl { .. })));
}
