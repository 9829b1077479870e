//! Poller behavior against a mock status endpoint.

mod common;

use std::time::Duration;

use agentctl::poller::{self, PollSettings, PollUpdate};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::test_client;

fn fast_settings(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(5),
        max_attempts,
    }
}

fn running_body() -> serde_json::Value {
    serde_json::json!({ "task_id": "t1", "status": "running" })
}

/// Drain updates until the channel closes, returning them all.
async fn collect_updates(
    mut receiver: tokio::sync::mpsc::UnboundedReceiver<PollUpdate>,
) -> Vec<PollUpdate> {
    let mut updates = Vec::new();
    while let Some(update) = receiver.recv().await {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn always_running_task_times_out_after_exact_attempt_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(running_body()))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let (_handle, receiver) = poller::spawn(client, "t1".to_string(), fast_settings(60));
    let updates = collect_updates(receiver).await;

    assert_eq!(updates.last(), Some(&PollUpdate::TimedOut));
    // 60 running updates plus the terminal timeout.
    assert_eq!(updates.len(), 61);
    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 60);
}

#[tokio::test]
async fn polling_stops_once_a_terminal_status_arrives() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(running_body()))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "t1",
            "status": "completed",
            "result": { "content": "done" }
        })))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let (handle, receiver) = poller::spawn(client, "t1".to_string(), fast_settings(60));
    let updates = collect_updates(receiver).await;
    handle.join().await;

    assert_eq!(
        updates.last(),
        Some(&PollUpdate::Completed {
            content: "done".to_string()
        })
    );

    // Give any stray timer a few intervals to prove itself absent.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn failed_status_wraps_server_error_in_apology() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "t1",
            "status": "failed",
            "error": "tool exploded"
        })))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let (_handle, receiver) = poller::spawn(client, "t1".to_string(), fast_settings(60));
    let updates = collect_updates(receiver).await;

    match updates.last() {
        Some(PollUpdate::Failed { message }) => {
            assert!(message.starts_with("Sorry"));
            assert!(message.contains("tool exploded"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_error_is_terminal_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let (_handle, receiver) = poller::spawn(client, "t1".to_string(), fast_settings(60));
    let updates = collect_updates(receiver).await;

    assert_eq!(updates.len(), 1);
    assert!(matches!(updates[0], PollUpdate::Failed { .. }));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn cancel_stops_the_chain_before_the_next_tick() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(running_body()))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let settings = PollSettings {
        interval: Duration::from_secs(3600),
        max_attempts: 60,
    };
    let (handle, receiver) = poller::spawn(client, "t1".to_string(), settings);
    handle.cancel();

    let updates = collect_updates(receiver).await;
    assert!(updates.is_empty());
    let requests = server.received_requests().await.expect("recorded requests");
    assert!(requests.is_empty());
}
