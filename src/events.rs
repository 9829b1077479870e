//! Chat event decoding.
//!
//! Events arrive from the chat stream and task event log as loosely shaped
//! JSON objects. They are decoded into an explicit tagged enum exactly once,
//! here, at the network boundary; everything downstream matches on the tag
//! instead of probing for field presence.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::Usage;

/// One typed message in the chat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    User {
        id: Option<String>,
        content: String,
        timestamp: Option<DateTime<Utc>>,
    },
    Assistant {
        id: Option<String>,
        content: String,
        timestamp: Option<DateTime<Utc>>,
        agent_id: Option<String>,
        agent_name: Option<String>,
    },
    /// Partial streamed token sequence; `is_final` marks the terminal chunk
    /// of one assistant turn.
    Chunk {
        chunk: String,
        chunk_index: u32,
        is_final: bool,
    },
    /// A completed, non-streamed assistant turn.
    Completed {
        content: String,
        timestamp: Option<DateTime<Utc>>,
        usage: Option<Usage>,
    },
    ToolCallStarted {
        tool_name: String,
        tool_call_id: Option<String>,
        arguments: Value,
    },
    ToolResult {
        tool_name: String,
        result: Value,
        success: bool,
        execution_time: Option<f64>,
        arguments: Option<Value>,
    },
    WorkflowResult {
        result: Option<Value>,
        final_response: Option<String>,
        success: bool,
        iterations_completed: Option<u32>,
        total_cost: Option<f64>,
    },
    /// Unrecognized shape, kept verbatim and rendered as plain text.
    Raw(Value),
}

impl ChatEvent {
    /// Decode a raw event object.
    ///
    /// Uses the `event_type` tag when the server sends one, otherwise falls
    /// back to shape discrimination: `chunk` wins, then `tool_name` with a
    /// `result`, then `tool_name` with `arguments`, then a workflow result
    /// (`final_response`/`result` plus `success`), then role-tagged plain
    /// messages. Anything else becomes `Raw` - decoding never fails.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if let Some(tag) = value.get("event_type").and_then(Value::as_str) {
            match tag {
                "user_message" => return decode_user(&value),
                "assistant_message" => return decode_assistant(&value),
                "llm_chunk" => {
                    if let Some(event) = decode_chunk(&value) {
                        return event;
                    }
                }
                "llm_response" => return decode_completed(&value),
                "tool_call_started" => {
                    if let Some(event) = decode_tool_call(&value) {
                        return event;
                    }
                }
                "tool_result" => {
                    if let Some(event) = decode_tool_result(&value) {
                        return event;
                    }
                }
                "workflow_result" => return decode_workflow(&value),
                _ => {}
            }
            return ChatEvent::Raw(value);
        }

        if value.get("chunk").is_some()
            && let Some(event) = decode_chunk(&value)
        {
            return event;
        }
        if value.get("tool_name").is_some() {
            if value.get("result").is_some()
                && let Some(event) = decode_tool_result(&value)
            {
                return event;
            }
            if value.get("arguments").is_some()
                && let Some(event) = decode_tool_call(&value)
            {
                return event;
            }
        }
        if value.get("success").is_some()
            && (value.get("final_response").is_some() || value.get("result").is_some())
        {
            return decode_workflow(&value);
        }
        match value.get("role").and_then(Value::as_str) {
            Some("user") => return decode_user(&value),
            Some("assistant") => return decode_assistant(&value),
            _ => {}
        }
        if value.get("content").is_some() {
            if value.get("usage").is_some() {
                return decode_completed(&value);
            }
            return decode_assistant(&value);
        }
        ChatEvent::Raw(value)
    }
}

// === Per-shape decoders ===

fn decode_user(value: &Value) -> ChatEvent {
    ChatEvent::User {
        id: string_field(value, "id"),
        content: string_field(value, "content").unwrap_or_default(),
        timestamp: timestamp_field(value),
    }
}

fn decode_assistant(value: &Value) -> ChatEvent {
    ChatEvent::Assistant {
        id: string_field(value, "id"),
        content: string_field(value, "content").unwrap_or_default(),
        timestamp: timestamp_field(value),
        agent_id: string_field(value, "agent_id"),
        agent_name: string_field(value, "agent_name"),
    }
}

fn decode_chunk(value: &Value) -> Option<ChatEvent> {
    let chunk = string_field(value, "chunk")?;
    let chunk_index = value
        .get("chunk_index")
        .and_then(Value::as_u64)
        .and_then(|index| u32::try_from(index).ok())
        .unwrap_or(0);
    let is_final = value
        .get("is_final")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(ChatEvent::Chunk {
        chunk,
        chunk_index,
        is_final,
    })
}

fn decode_completed(value: &Value) -> ChatEvent {
    let usage = value
        .get("usage")
        .cloned()
        .and_then(|usage| serde_json::from_value::<Usage>(usage).ok());
    ChatEvent::Completed {
        content: string_field(value, "content").unwrap_or_default(),
        timestamp: timestamp_field(value),
        usage,
    }
}

fn decode_tool_call(value: &Value) -> Option<ChatEvent> {
    let tool_name = string_field(value, "tool_name")?;
    Some(ChatEvent::ToolCallStarted {
        tool_name,
        tool_call_id: string_field(value, "tool_call_id"),
        arguments: value.get("arguments").cloned().unwrap_or(Value::Null),
    })
}

fn decode_tool_result(value: &Value) -> Option<ChatEvent> {
    let tool_name = string_field(value, "tool_name")?;
    Some(ChatEvent::ToolResult {
        tool_name,
        result: value.get("result").cloned().unwrap_or(Value::Null),
        success: value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        execution_time: value.get("execution_time").and_then(Value::as_f64),
        arguments: value.get("arguments").cloned(),
    })
}

fn decode_workflow(value: &Value) -> ChatEvent {
    ChatEvent::WorkflowResult {
        result: value.get("result").cloned(),
        final_response: string_field(value, "final_response"),
        success: value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        iterations_completed: value
            .get("iterations_completed")
            .and_then(Value::as_u64)
            .and_then(|count| u32::try_from(count).ok()),
        total_cost: value.get("total_cost").and_then(Value::as_f64),
    }
}

/// Final text of a workflow result: `result` wins, `final_response` is the
/// fallback. Exactly one of the two is meaningful per event.
#[must_use]
pub fn workflow_text(result: Option<&Value>, final_response: Option<&str>) -> String {
    if let Some(result) = result
        && !result.is_null()
    {
        return match result.as_str() {
            Some(text) => text.to_string(),
            None => result.to_string(),
        };
    }
    final_response.unwrap_or_default().to_string()
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn timestamp_field(value: &Value) -> Option<DateTime<Utc>> {
    value
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn chunk_shape_wins() {
        let event = ChatEvent::from_value(json!({
            "chunk": "Hel",
            "chunk_index": 0,
            "is_final": false
        }));
        assert_eq!(
            event,
            ChatEvent::Chunk {
                chunk: "Hel".to_string(),
                chunk_index: 0,
                is_final: false
            }
        );
    }

    #[test]
    fn tool_result_beats_tool_call_when_result_present() {
        let event = ChatEvent::from_value(json!({
            "tool_name": "search",
            "arguments": { "q": "rust" },
            "result": "3 hits",
            "success": true,
            "execution_time": 0.42
        }));
        match event {
            ChatEvent::ToolResult {
                tool_name,
                success,
                execution_time,
                arguments,
                ..
            } => {
                assert_eq!(tool_name, "search");
                assert!(success);
                assert_eq!(execution_time, Some(0.42));
                assert!(arguments.is_some());
            }
            other => panic!("expected ToolResult, got {other:?}"),
        }
    }

    #[test]
    fn tool_call_without_result_is_started() {
        let event = ChatEvent::from_value(json!({
            "tool_name": "search",
            "tool_call_id": "call-1",
            "arguments": { "q": "rust" }
        }));
        match event {
            ChatEvent::ToolCallStarted {
                tool_name,
                tool_call_id,
                ..
            } => {
                assert_eq!(tool_name, "search");
                assert_eq!(tool_call_id.as_deref(), Some("call-1"));
            }
            other => panic!("expected ToolCallStarted, got {other:?}"),
        }
    }

    #[test]
    fn workflow_shape_from_final_response() {
        let event = ChatEvent::from_value(json!({
            "final_response": "done",
            "success": true,
            "iterations_completed": 3
        }));
        match event {
            ChatEvent::WorkflowResult {
                result,
                final_response,
                success,
                iterations_completed,
                ..
            } => {
                assert_eq!(result, None);
                assert_eq!(final_response.as_deref(), Some("done"));
                assert!(success);
                assert_eq!(iterations_completed, Some(3));
            }
            other => panic!("expected WorkflowResult, got {other:?}"),
        }
    }

    #[test]
    fn explicit_event_type_tag_overrides_shape() {
        let event = ChatEvent::from_value(json!({
            "event_type": "user_message",
            "content": "hi",
            "success": true,
            "result": "red herring"
        }));
        match event {
            ChatEvent::User { content, .. } => assert_eq!(content, "hi"),
            other => panic!("expected User, got {other:?}"),
        }
    }

    #[test]
    fn unknown_shape_falls_back_to_raw() {
        let value = json!({ "mystery": 42 });
        let event = ChatEvent::from_value(value.clone());
        assert_eq!(event, ChatEvent::Raw(value));
    }

    #[test]
    fn unknown_event_type_tag_falls_back_to_raw() {
        let value = json!({ "event_type": "telemetry", "content": "x" });
        assert!(matches!(
            ChatEvent::from_value(value),
            ChatEvent::Raw(_)
        ));
    }

    #[test]
    fn workflow_text_prefers_result_then_final_response() {
        assert_eq!(
            workflow_text(Some(&json!("from result")), Some("from final")),
            "from result"
        );
        assert_eq!(workflow_text(None, Some("from final")), "from final");
        assert_eq!(workflow_text(Some(&Value::Null), Some("from final")), "from final");
    }

    #[test]
    fn role_tagged_messages_decode() {
        let event = ChatEvent::from_value(json!({
            "role": "user",
            "id": "m1",
            "content": "hello",
            "timestamp": "2026-01-05T10:00:00Z"
        }));
        match event {
            ChatEvent::User { id, timestamp, .. } => {
                assert_eq!(id.as_deref(), Some("m1"));
                assert!(timestamp.is_some());
            }
            other => panic!("expected User, got {other:?}"),
        }
    }
}
