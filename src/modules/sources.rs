//! Data source CRUD calls. The presigned upload flow lives in
//! `crate::upload`.

use serde_json::Value;

use crate::client::{ApiError, PlatformClient};
use crate::models::SourceRecord;

pub async fn list(client: &PlatformClient) -> Result<Vec<SourceRecord>, ApiError> {
    client.get_json("/api/v1/sources").await
}

pub async fn get(client: &PlatformClient, source_id: &str) -> Result<SourceRecord, ApiError> {
    client.get_json(&format!("/api/v1/sources/{source_id}")).await
}

pub async fn create(client: &PlatformClient, payload: &Value) -> Result<SourceRecord, ApiError> {
    client.post_json("/api/v1/sources", payload).await
}

pub async fn delete(client: &PlatformClient, source_id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/api/v1/sources/{source_id}")).await
}
