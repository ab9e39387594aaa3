//! Integration tests for the streaming chat client using wiremock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use streamchat_client::{DeliveryMode, StreamingChatClient};
use streamchat_core::{ChatBackend, StreamError, StreamHandle, StreamOutcome, StreamRequest};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/api/chat/send";

/// What a caller observed, in order.
#[derive(Debug)]
enum Seen {
    Fragment(String),
    Done(StreamOutcome),
}

async fn mount_body(server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn client(server: &MockServer, mode: DeliveryMode) -> StreamingChatClient {
    StreamingChatClient::new("test-token")
        .base_url(server.uri())
        .delivery(mode)
}

async fn collect(handle: StreamHandle) -> (Vec<String>, StreamOutcome) {
    let mut fragments = Vec::new();
    let outcome = handle.drive(|t| fragments.push(t)).await;
    (fragments, outcome)
}

/// Run `send` and wait for it, returning every callback in call order.
async fn send_and_record(client: &StreamingChatClient, text: &str) -> Vec<Seen> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_fragment = {
        let seen = Arc::clone(&seen);
        move |t: String| seen.lock().unwrap().push(Seen::Fragment(t))
    };
    let on_done = {
        let seen = Arc::clone(&seen);
        move |o: StreamOutcome| seen.lock().unwrap().push(Seen::Done(o))
    };
    client
        .send(StreamRequest::new(text), on_fragment, on_done)
        .await
        .expect("send task panicked");
    std::mem::take(&mut *seen.lock().unwrap())
}

#[tokio::test]
async fn sends_bearer_token_and_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "message": "Hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("data: ok\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, DeliveryMode::PerRecord);
    let (fragments, outcome) = collect(client.stream(StreamRequest::new("Hi")).await).await;

    assert_eq!(fragments, ["ok"]);
    assert!(outcome.is_completed(), "expected Completed, got: {outcome:?}");
}

#[tokio::test]
async fn per_record_delivers_each_record() {
    let server = MockServer::start().await;
    mount_body(&server, "data: Hello\ndata:  World\n\n").await;

    let client = client(&server, DeliveryMode::PerRecord);
    let (fragments, outcome) = collect(client.stream(StreamRequest::new("Hi")).await).await;

    assert_eq!(fragments, ["Hello", " World"]);
    assert_eq!(fragments.concat(), "Hello World");
    assert!(outcome.is_completed());
}

#[tokio::test]
async fn buffered_delivers_one_concatenated_fragment() {
    let server = MockServer::start().await;
    mount_body(&server, "data: Hello\ndata:  World\n\n").await;

    let client = client(&server, DeliveryMode::Buffered);
    let (fragments, outcome) = collect(client.stream(StreamRequest::new("Hi")).await).await;

    assert_eq!(fragments, ["Hello World"]);
    assert!(outcome.is_completed());
}

#[tokio::test]
async fn buffered_body_without_records_yields_empty_fragment_then_completes() {
    let server = MockServer::start().await;
    mount_body(&server, "event: ping\n\nnot a record\n").await;

    let client = client(&server, DeliveryMode::Buffered);
    let seen = send_and_record(&client, "Hi").await;

    assert_eq!(seen.len(), 2, "got: {seen:?}");
    assert!(matches!(&seen[0], Seen::Fragment(t) if t.is_empty()));
    assert!(matches!(&seen[1], Seen::Done(StreamOutcome::Completed)));
}

#[tokio::test]
async fn per_record_body_without_records_only_completes() {
    let server = MockServer::start().await;
    mount_body(&server, "\n\n: keep-alive\n").await;

    let client = client(&server, DeliveryMode::PerRecord);
    let seen = send_and_record(&client, "Hi").await;

    assert_eq!(seen.len(), 1, "got: {seen:?}");
    assert!(matches!(&seen[0], Seen::Done(StreamOutcome::Completed)));
}

#[tokio::test]
async fn send_invokes_fragments_before_done() {
    let server = MockServer::start().await;
    mount_body(&server, "data: a\ndata: b\ndata: c\n").await;

    let client = client(&server, DeliveryMode::PerRecord);
    let seen = send_and_record(&client, "Hi").await;

    let fragments: Vec<&str> = seen
        .iter()
        .filter_map(|s| match s {
            Seen::Fragment(t) => Some(t.as_str()),
            Seen::Done(_) => None,
        })
        .collect();
    assert_eq!(fragments, ["a", "b", "c"]);
    assert!(matches!(seen.last(), Some(Seen::Done(StreamOutcome::Completed))));
    assert_eq!(
        seen.iter().filter(|s| matches!(s, Seen::Done(_))).count(),
        1
    );
}

#[tokio::test]
async fn http_500_fails_once_without_fragments() {
    let server = MockServer::start().await;

    for mode in [DeliveryMode::PerRecord, DeliveryMode::Buffered] {
        server.reset().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("data: should not leak\n"))
            .mount(&server)
            .await;

        let seen = send_and_record(&client(&server, mode), "Hi").await;
        assert_eq!(seen.len(), 1, "mode {mode}: got {seen:?}");
        match &seen[0] {
            Seen::Done(StreamOutcome::Failed(err)) => {
                assert_eq!(err.status(), Some(500));
                assert!(err.is_retryable());
            }
            other => panic!("mode {mode}: expected HTTP failure, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn http_401_reports_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let client = client(&server, DeliveryMode::PerRecord);
    let (fragments, outcome) = collect(client.stream(StreamRequest::new("Hi")).await).await;

    assert!(fragments.is_empty());
    match outcome {
        StreamOutcome::Failed(StreamError::HttpStatus { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad token");
        }
        other => panic!("expected HttpStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("data: late\n")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client(&server, DeliveryMode::PerRecord).timeout(Duration::from_millis(100));
    let seen = send_and_record(&client, "Hi").await;

    assert_eq!(seen.len(), 1, "got: {seen:?}");
    assert!(matches!(
        &seen[0],
        Seen::Done(StreamOutcome::Failed(StreamError::Timeout))
    ));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Port 1 on loopback is not listening.
    let client = StreamingChatClient::new("test-token").base_url("http://127.0.0.1:1");
    let (fragments, outcome) = collect(client.stream(StreamRequest::new("Hi")).await).await;

    assert!(fragments.is_empty());
    let err = outcome.error().expect("expected failure");
    assert!(err.is_network(), "expected network error, got: {err:?}");
}

#[tokio::test]
async fn non_utf8_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data: \xFF\xFE\n".to_vec()))
        .mount(&server)
        .await;

    for mode in [DeliveryMode::PerRecord, DeliveryMode::Buffered] {
        let seen = send_and_record(&client(&server, mode), "Hi").await;
        assert_eq!(seen.len(), 1, "mode {mode}: got {seen:?}");
        assert!(matches!(
            &seen[0],
            Seen::Done(StreamOutcome::Failed(StreamError::Decode(_)))
        ));
    }
}

#[tokio::test]
async fn client_works_as_generic_backend() {
    async fn ask(backend: &impl ChatBackend, text: &str) -> String {
        let mut reply = String::new();
        let outcome = backend
            .stream(StreamRequest::new(text))
            .await
            .drive(|t| reply.push_str(&t))
            .await;
        assert!(outcome.is_completed());
        reply
    }

    let server = MockServer::start().await;
    mount_body(&server, "data: pong\n").await;

    let client = client(&server, DeliveryMode::PerRecord);
    assert_eq!(ask(&client, "ping").await, "pong");
}
