//! End-to-end chat flow: submit, placeholder, poll, in-place resolution.

mod common;

use std::time::Duration;

use agentctl::events::ChatEvent;
use agentctl::modules::chat::{self, SendMessageOptions};
use agentctl::poller::{self, PollSettings, PollUpdate};
use agentctl::transcript::{THINKING_PLACEHOLDER, Transcript};
use futures_util::StreamExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::test_client;

#[tokio::test]
async fn send_poll_and_resolve_in_place() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/messages"))
        .and(body_partial_json(serde_json::json!({
            "agent_id": "a1",
            "message": "List my agents"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": "t1" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "t1",
            "status": "running"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/t1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "t1",
            "status": "completed",
            "content": "You have 3 agents."
        })))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let mut transcript = Transcript::new();
    transcript.push_user("List my agents");

    let created = chat::send(
        &client,
        SendMessageOptions {
            agent_id: "a1".to_string(),
            message: "List my agents".to_string(),
            conversation_id: None,
        },
    )
    .await
    .expect("send message");
    assert_eq!(created.task_id, "t1");

    transcript.push_placeholder(&created.task_id);
    assert_eq!(
        transcript.get("t1").expect("placeholder").content,
        THINKING_PLACEHOLDER
    );

    let settings = PollSettings {
        interval: Duration::from_millis(5),
        max_attempts: 60,
    };
    let (handle, mut updates) = poller::spawn(client, created.task_id.clone(), settings);

    let mut saw_running = false;
    while let Some(update) = updates.recv().await {
        match update {
            // First poll: running, nothing changes.
            PollUpdate::Running { .. } => saw_running = true,
            PollUpdate::Completed { content } => {
                transcript.resolve(&created.task_id, &content);
            }
            other => panic!("unexpected update {other:?}"),
        }
    }
    handle.join().await;

    assert!(saw_running);
    let message = transcript.get("t1").expect("resolved entry");
    assert_eq!(message.content, "You have 3 agents.");
    assert!(!message.pending);
    // One user message, one agent entry updated in place.
    assert_eq!(transcript.messages().len(), 2);

    // Polling stopped at the terminal status: send + two status fetches.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn chat_stream_decodes_events_at_the_boundary() {
    let server = MockServer::start().await;

    let sse_body = concat!(
        "data: {\"chunk\": \"Hello\", \"chunk_index\": 0, \"is_final\": false}\n\n",
        "data: {\"chunk\": \" there\", \"chunk_index\": 1, \"is_final\": true}\n\n",
        "data: {\"tool_name\": \"search\", \"result\": \"2 hits\", \"success\": true}\n\n",
        "data: not json at all\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body),
        )
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let stream = chat::stream(
        &client,
        SendMessageOptions {
            agent_id: "a1".to_string(),
            message: "hi".to_string(),
            conversation_id: None,
        },
    )
    .await
    .expect("open stream");
    tokio::pin!(stream);

    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event);
    }

    // The malformed frame is skipped, the rest decode in order.
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[0],
        ChatEvent::Chunk {
            chunk_index: 0,
            is_final: false,
            ..
        }
    ));
    assert!(matches!(
        events[1],
        ChatEvent::Chunk {
            chunk_index: 1,
            is_final: true,
            ..
        }
    ));
    assert!(matches!(events[2], ChatEvent::ToolResult { .. }));
}
