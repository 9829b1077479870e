//! Provider spec and config calls.

use serde_json::Value;

use crate::client::{ApiError, PlatformClient};
use crate::models::{ProviderConfig, ProviderSpec};

/// Provider capability descriptors (which provider types exist and which
/// models each can serve).
pub async fn specs(client: &PlatformClient) -> Result<Vec<ProviderSpec>, ApiError> {
    client.get_json("/api/v1/providers/specs").await
}

pub async fn list(client: &PlatformClient) -> Result<Vec<ProviderConfig>, ApiError> {
    client.get_json("/api/v1/providers").await
}

pub async fn create(client: &PlatformClient, payload: &Value) -> Result<ProviderConfig, ApiError> {
    client.post_json("/api/v1/providers", payload).await
}

pub async fn delete(client: &PlatformClient, provider_id: &str) -> Result<(), ApiError> {
    client
        .delete(&format!("/api/v1/providers/{provider_id}"))
        .await
}
