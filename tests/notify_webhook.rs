//! Webhook post contract, exercised against a local HTTP server: success is
//! strictly HTTP 200 with a body of `ok`.

use std::net::SocketAddr;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use aira_backend::notify::{post_notification, NOTIFY_PREFIX};

async fn spawn_receiver(
    status: StatusCode,
    body: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/services/hook",
        post(move |Json(payload): Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(payload);
                (status, body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, rx)
}

#[tokio::test]
async fn ok_body_with_status_200_is_success() {
    let (addr, mut received) = spawn_receiver(StatusCode::OK, "ok").await;
    let url = format!("http://{}/services/hook", addr);
    let client = reqwest::Client::new();

    let outcome = post_notification(&client, "MSA-001은 인증 지연 문제입니다.", &url).await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "✅ Slack으로 전송 완료");

    let payload = received.recv().await.unwrap();
    let text = payload["text"].as_str().unwrap();
    assert!(text.starts_with(NOTIFY_PREFIX));
    assert!(text.contains("\n\nMSA-001은 인증 지연 문제입니다."));
}

#[tokio::test]
async fn non_ok_body_is_failure_with_status_and_body() {
    let (addr, _received) = spawn_receiver(StatusCode::OK, "invalid_payload").await;
    let url = format!("http://{}/services/hook", addr);
    let client = reqwest::Client::new();

    let outcome = post_notification(&client, "result", &url).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("200"));
    assert!(outcome.message.contains("invalid_payload"));
}

#[tokio::test]
async fn non_200_status_is_failure() {
    let (addr, _received) = spawn_receiver(StatusCode::NOT_FOUND, "no_service").await;
    let url = format!("http://{}/services/hook", addr);
    let client = reqwest::Client::new();

    let outcome = post_notification(&client, "result", &url).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("404"));
    assert!(outcome.message.contains("no_service"));
}

#[tokio::test]
async fn unreachable_host_reports_the_transport_error() {
    let client = reqwest::Client::new();
    // Bind-then-drop so the port is known to be closed.
    let closed_port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}/services/hook", closed_port);

    let outcome = post_notification(&client, "result", &url).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("전송 중 예외 발생"));
}

#[tokio::test]
async fn full_result_is_sent_without_truncation() {
    let (addr, mut received) = spawn_receiver(StatusCode::OK, "ok").await;
    let url = format!("http://{}/services/hook", addr);
    let client = reqwest::Client::new();

    let long_result = "진단 결과 ".repeat(2000);
    let outcome = post_notification(&client, &long_result, &url).await;
    assert!(outcome.success);

    let payload = received.recv().await.unwrap();
    let text = payload["text"].as_str().unwrap();
    assert!(text.ends_with(long_result.as_str()));
}
