//! Model spec and instance calls.

use serde_json::Value;

use crate::client::{ApiError, PlatformClient};
use crate::models::{ModelInstance, ModelSpec};

/// Model descriptors, optionally narrowed to one provider type.
pub async fn specs(
    client: &PlatformClient,
    provider_type: Option<&str>,
) -> Result<Vec<ModelSpec>, ApiError> {
    match provider_type {
        Some(provider_type) => {
            client
                .get_json_with_query("/api/v1/models/specs", &[("provider_type", provider_type)])
                .await
        }
        None => client.get_json("/api/v1/models/specs").await,
    }
}

pub async fn list(client: &PlatformClient) -> Result<Vec<ModelInstance>, ApiError> {
    client.get_json("/api/v1/models").await
}

pub async fn create(client: &PlatformClient, payload: &Value) -> Result<ModelInstance, ApiError> {
    client.post_json("/api/v1/models", payload).await
}

pub async fn delete(client: &PlatformClient, model_id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/api/v1/models/{model_id}")).await
}
