//! The default hyper transport against an in-process axum server.

#![cfg(all(feature = "tls-ring", feature = "tls-native-roots"))]

use std::time::Duration;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use hostfetch::http::{Method, StatusCode};
use hostfetch::{Client, ClientError, HyperTransport, RequestConfig};

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

async fn echo_headers(headers: HeaderMap) -> String {
    format!(
        "a={} b={} c={} type={}",
        header(&headers, "x-a"),
        header(&headers, "x-b"),
        header(&headers, "x-c"),
        header(&headers, "content-type"),
    )
}

async fn echo_body(method: Method, body: String) -> String {
    format!("{method} {body}")
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

async fn missing() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "nothing here")
}

/// Start a server on an ephemeral port and return its base URL.
async fn start_server() -> String {
    let app = Router::new()
        .route("/headers", get(echo_headers))
        .route("/body", post(echo_body).put(echo_body).patch(echo_body))
        .route("/slow", get(slow))
        .route("/missing", get(missing));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn get_sends_merged_headers() {
    let base_url = start_server().await;
    let client = Client::create(
        RequestConfig::new()
            .base_url(base_url.as_str())
            .header("x-a", "1")
            .header("x-b", "2"),
    )
    .unwrap();

    let response = client
        .get_with_config(
            "/headers",
            RequestConfig::new().header("x-b", "3").header("x-c", "4"),
        )
        .await
        .unwrap();

    assert!(response.ok());
    assert_eq!(response.url(), format!("{base_url}/headers"));
    assert_eq!(
        response.text().unwrap(),
        "a=1 b=3 c=4 type=application/json"
    );
}

#[tokio::test]
async fn body_verbs_send_the_configured_body() {
    let base_url = start_server().await;
    let client = Client::create(RequestConfig::new().base_url(base_url)).unwrap();

    let response = client
        .post_with_config("/body", RequestConfig::new().body(r#"{"id":1}"#))
        .await
        .unwrap();
    assert_eq!(response.text().unwrap(), r#"POST {"id":1}"#);

    let response = client
        .patch_with_config("/body", RequestConfig::new().body("partial"))
        .await
        .unwrap();
    assert_eq!(response.text().unwrap(), "PATCH partial");
}

#[tokio::test]
async fn non_success_status_is_a_response() {
    let base_url = start_server().await;
    let client = Client::create(RequestConfig::new().base_url(base_url)).unwrap();

    let response = client.get("/missing").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.ok());
    assert_eq!(response.text().unwrap(), "nothing here");
}

#[tokio::test]
async fn slow_handler_times_out() {
    let base_url = start_server().await;
    let client = Client::builder()
        .base_url(base_url)
        .timeout(Duration::from_millis(100))
        .transport(HyperTransport::builder().pool_max_idle_per_host(1).build().unwrap())
        .build()
        .unwrap();

    let err = client.get("/slow").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Timeout {
            endpoint: "/slow".into(),
            timeout: Duration::from_millis(100),
        }
    );
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::create(RequestConfig::new().base_url(format!("http://{addr}"))).unwrap();
    let err = client.get("/").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn malformed_url_is_an_invalid_request() {
    let client = Client::create(RequestConfig::new().base_url("not a url")).unwrap();
    let err = client.get("/x").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)), "{err:?}");
}
