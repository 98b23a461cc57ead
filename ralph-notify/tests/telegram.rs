//! Integration tests for the Telegram notifier using wiremock.

use ralph_core::error::NotifyError;
use ralph_core::notify::Notifier;
use ralph_notify::TelegramNotifier;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn send_posts_markdown_message_to_chat() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .and(body_json(serde_json::json!({
            "chat_id": "-100",
            "text": "*Ralph Agent Report*",
            "parse_mode": "Markdown",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": { "message_id": 7 },
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = TelegramNotifier::new("123:ABC", "-100").base_url(mock_server.uri());
    let result = notifier.send("*Ralph Agent Report*").await;
    assert!(result.is_ok(), "expected Ok, got: {:?}", result.err());
}

#[tokio::test]
async fn rejected_status_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "ok": false,
            "description": "Bad Request: chat not found",
        })))
        .mount(&mock_server)
        .await;

    let notifier = TelegramNotifier::new("t", "missing").base_url(mock_server.uri());
    let err = notifier.send("hello").await.unwrap_err();
    match err {
        NotifyError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("chat not found"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_api_is_transport_error() {
    let notifier = TelegramNotifier::new("t", "c").base_url("http://127.0.0.1:1");
    let err = notifier.send("hello").await.unwrap_err();
    assert!(matches!(err, NotifyError::Transport(_)));
}

#[tokio::test]
async fn alert_uses_send_with_marker() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(serde_json::json!({
            "chat_id": "c",
            "text": "⚠️ cycle failed",
            "parse_mode": "Markdown",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = TelegramNotifier::new("t", "c").base_url(mock_server.uri());
    notifier.alert("cycle failed").await.unwrap();
}
