//! MCP server management calls.

use serde_json::Value;

use crate::client::{ApiError, PlatformClient};
use crate::models::McpServer;

pub async fn list(client: &PlatformClient) -> Result<Vec<McpServer>, ApiError> {
    client.get_json("/api/v1/mcp-servers").await
}

pub async fn get(client: &PlatformClient, server_id: &str) -> Result<McpServer, ApiError> {
    client
        .get_json(&format!("/api/v1/mcp-servers/{server_id}"))
        .await
}

pub async fn create(client: &PlatformClient, payload: &Value) -> Result<McpServer, ApiError> {
    client.post_json("/api/v1/mcp-servers", payload).await
}

pub async fn delete(client: &PlatformClient, server_id: &str) -> Result<(), ApiError> {
    client
        .delete(&format!("/api/v1/mcp-servers/{server_id}"))
        .await
}

pub async fn start(client: &PlatformClient, server_id: &str) -> Result<McpServer, ApiError> {
    client
        .post_json(&format!("/api/v1/mcp-servers/{server_id}/start"), &Value::Null)
        .await
}

pub async fn stop(client: &PlatformClient, server_id: &str) -> Result<McpServer, ApiError> {
    client
        .post_json(&format!("/api/v1/mcp-servers/{server_id}/stop"), &Value::Null)
        .await
}

pub async fn deploy(client: &PlatformClient, server_id: &str) -> Result<McpServer, ApiError> {
    client
        .post_json(
            &format!("/api/v1/mcp-servers/{server_id}/deploy"),
            &Value::Null,
        )
        .await
}

/// Health probe for one server instance; the body shape varies by
/// transport, so it is surfaced as raw JSON.
pub async fn health(client: &PlatformClient, server_id: &str) -> Result<Value, ApiError> {
    client
        .get_json(&format!("/api/v1/mcp-servers/{server_id}/health"))
        .await
}
