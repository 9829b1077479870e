//! Chat calls: message submission, streaming, and conversation history.

use anyhow::Result;
use serde_json::json;

use crate::client::{ApiError, PlatformClient};
use crate::events::ChatEvent;
use crate::models::{Conversation, TaskCreated};

/// Options for sending a chat message.
#[derive(Debug)]
pub struct SendMessageOptions {
    pub agent_id: String,
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Submit a chat message. The server answers with the task id to poll.
pub async fn send(
    client: &PlatformClient,
    options: SendMessageOptions,
) -> Result<TaskCreated, ApiError> {
    let mut payload = json!({
        "agent_id": options.agent_id,
        "message": options.message,
    });
    if let Some(conversation_id) = options.conversation_id {
        payload["conversation_id"] = json!(conversation_id);
    }
    client.post_json("/api/v1/chat/messages", &payload).await
}

/// Open a streaming chat turn; events are decoded as they arrive.
pub async fn stream(
    client: &PlatformClient,
    options: SendMessageOptions,
) -> Result<impl futures_util::Stream<Item = ChatEvent> + use<>, ApiError> {
    let mut payload = json!({
        "agent_id": options.agent_id,
        "message": options.message,
    });
    if let Some(conversation_id) = options.conversation_id {
        payload["conversation_id"] = json!(conversation_id);
    }
    client.event_stream("/api/v1/chat/stream", &payload).await
}

pub async fn conversations(client: &PlatformClient) -> Result<Vec<Conversation>, ApiError> {
    client.get_json("/api/v1/chat/conversations").await
}
