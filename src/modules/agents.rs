//! Agent CRUD calls.

use serde_json::Value;

use crate::client::{ApiError, PlatformClient};
use crate::models::Agent;

pub async fn list(client: &PlatformClient) -> Result<Vec<Agent>, ApiError> {
    client.get_json("/api/v1/agents").await
}

pub async fn get(client: &PlatformClient, agent_id: &str) -> Result<Agent, ApiError> {
    client.get_json(&format!("/api/v1/agents/{agent_id}")).await
}

pub async fn create(client: &PlatformClient, payload: &Value) -> Result<Agent, ApiError> {
    client.post_json("/api/v1/agents", payload).await
}

pub async fn delete(client: &PlatformClient, agent_id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/api/v1/agents/{agent_id}")).await
}
