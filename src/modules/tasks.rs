//! Task lifecycle calls: status polling, cancellation, pause/resume, and the
//! persisted event log.

use serde_json::Value;

use crate::client::{ApiError, PlatformClient};
use crate::events::ChatEvent;
use crate::models::{TaskStatus, TaskSummary};

/// Options for listing tasks.
#[derive(Debug, Default)]
pub struct TaskListOptions {
    pub agent_id: Option<String>,
    pub status: Option<String>,
}

pub async fn list(
    client: &PlatformClient,
    options: TaskListOptions,
) -> Result<Vec<TaskSummary>, ApiError> {
    let mut query: Vec<(&str, &str)> = Vec::new();
    if let Some(agent_id) = options.agent_id.as_deref() {
        query.push(("agent_id", agent_id));
    }
    if let Some(status) = options.status.as_deref() {
        query.push(("status", status));
    }
    client
        .get_json_with_query("/api/v1/tasks", &query)
        .await
}

pub async fn status(client: &PlatformClient, task_id: &str) -> Result<TaskStatus, ApiError> {
    client
        .get_json(&format!("/api/v1/tasks/{task_id}/status"))
        .await
}

pub async fn cancel(client: &PlatformClient, task_id: &str) -> Result<TaskStatus, ApiError> {
    client
        .post_json(&format!("/api/v1/tasks/{task_id}/cancel"), &Value::Null)
        .await
}

pub async fn pause(client: &PlatformClient, task_id: &str) -> Result<TaskStatus, ApiError> {
    client
        .post_json(&format!("/api/v1/tasks/{task_id}/pause"), &Value::Null)
        .await
}

pub async fn resume(client: &PlatformClient, task_id: &str) -> Result<TaskStatus, ApiError> {
    client
        .post_json(&format!("/api/v1/tasks/{task_id}/resume"), &Value::Null)
        .await
}

/// Fetch the persisted event log for a task, decoded at the boundary.
pub async fn events(client: &PlatformClient, task_id: &str) -> Result<Vec<ChatEvent>, ApiError> {
    let raw: Vec<Value> = client
        .get_json(&format!("/api/v1/tasks/{task_id}/events"))
        .await?;
    Ok(raw.into_iter().map(ChatEvent::from_value).collect())
}
