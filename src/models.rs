//! Typed request/response payloads for the agent platform API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// === Tasks ===

/// Server-reported task status label.
///
/// The client performs no transition validation; whatever the server
/// returns is taken at face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Success,
    Failed,
    Error,
    Paused,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Whether this status ends the polling chain.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed
                | TaskState::Success
                | TaskState::Failed
                | TaskState::Error
                | TaskState::Cancelled
        )
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Success)
    }

    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, TaskState::Failed | TaskState::Error)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Success => "success",
            TaskState::Failed => "failed",
            TaskState::Error => "error",
            TaskState::Paused => "paused",
            TaskState::Cancelled => "cancelled",
            TaskState::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Polled task status resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub execution_id: Option<String>,
    pub status: TaskState,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<TaskResult>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub artifacts: Option<Value>,
    #[serde(default)]
    pub usage_metadata: Option<Usage>,
}

impl TaskStatus {
    /// Final text for a completed task: `result.content`, falling back to
    /// the top-level `content` field.
    #[must_use]
    pub fn final_content(&self) -> Option<String> {
        self.result
            .as_ref()
            .and_then(|result| result.content.clone())
            .or_else(|| self.content.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub content: Option<String>,
}

/// Response to a task/message creation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreated {
    pub task_id: String,
}

/// Token/cost accounting attached to completed turns and task statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u64>,
    #[serde(default)]
    pub cost: Option<f64>,
}

/// Task list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub status: TaskState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// === Entities ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model_instance_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Provider capability descriptor served by `/providers/specs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub provider_type: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub name: String,
    pub provider_type: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub provider_type: String,
    #[serde(default)]
    pub context_window: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInstance {
    pub id: String,
    pub name: String,
    pub provider_id: String,
    pub model_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub transport: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// === Uploads ===

/// First step of the presigned upload handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUpload {
    pub upload_url: String,
    pub source_id: String,
}
