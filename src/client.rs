//! HTTP client for the agent platform API.
//!
//! This module centralizes request construction, authentication headers,
//! error extraction, and streaming helpers for agentctl's network requests.

use anyhow::Result;
use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::events::ChatEvent;
use crate::logging;

/// Header naming the tenant for every request.
pub const WORKSPACE_HEADER: &str = "X-Workspace-ID";

// === Types ===

/// Request context threaded into the client: everything needed to construct
/// an authenticated request, with no ambient state reads.
#[derive(Debug, Clone)]
pub struct Session {
    pub api_url: String,
    pub api_token: String,
    pub workspace: String,
    pub storage_url: Option<String>,
}

impl Session {
    /// Build a session from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            api_url: config.api_url(),
            api_token: config.api_token()?,
            workspace: config.workspace(),
            storage_url: config.storage_url(),
        })
    }
}

/// Errors surfaced by the gateway, one variant per failure class.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response; `message` is extracted from a structured error body
    /// when one is parseable, generic otherwise.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Server-side field validation errors (HTTP 422 with an `errors` map).
    #[error("Validation failed")]
    Validation {
        errors: std::collections::BTreeMap<String, String>,
    },

    /// 2xx response whose body failed to deserialize.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for agent platform API requests.
#[derive(Clone)]
#[must_use]
pub struct PlatformClient {
    http_client: reqwest::Client,
    session: Session,
}

// === PlatformClient ===

impl PlatformClient {
    /// Create a client bound to the given session. Every request carries the
    /// bearer token and workspace header from the session.
    pub fn new(session: Session) -> Result<Self> {
        logging::info(format!(
            "API base URL: {} (workspace: {})",
            session.api_url, session.workspace
        ));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", session.api_token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(WORKSPACE_HEADER, HeaderValue::from_str(&session.workspace)?);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.session.api_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http_client
            .get(self.url(path))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        decode_response(response).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        decode_response(response).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        decode_response(response).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http_client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        decode_response(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .http_client
            .delete(self.url(path))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        check_status(response).await?;
        Ok(())
    }

    /// Open a chat event stream (SSE) and decode each frame into a
    /// `ChatEvent` at the boundary. Malformed frames are skipped with a
    /// logged warning, never surfaced as stream errors.
    pub async fn event_stream(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<impl futures_util::Stream<Item = ChatEvent> + use<>, ApiError> {
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let response = check_status(response).await?;
        Ok(parse_sse_stream(response.bytes_stream()))
    }
}

// === Response Handling ===

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 422
        && let Some(errors) = parse_field_errors(&body)
    {
        return Err(ApiError::Validation { errors });
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        message: extract_error_message(status.as_u16(), &body),
    })
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    response.json::<T>().await.map_err(ApiError::Decode)
}

/// Pull a human-readable message out of a structured error body, falling
/// back to a generic string when the body is unparseable.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error", "message"] {
            match value.get(key) {
                Some(Value::String(message)) if !message.is_empty() => return message.clone(),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(message)) = inner.get("message") {
                        return message.clone();
                    }
                }
                _ => {}
            }
        }
    }
    format!("Request failed with status {status}")
}

/// Parse a 422 body of the shape `{"errors": {"field": "message"}}`.
fn parse_field_errors(body: &str) -> Option<std::collections::BTreeMap<String, String>> {
    let value: Value = serde_json::from_str(body).ok()?;
    let errors = value.get("errors")?.as_object()?;
    let mut map = std::collections::BTreeMap::new();
    for (field, message) in errors {
        if let Some(message) = message.as_str() {
            map.insert(field.clone(), message.to_string());
        }
    }
    if map.is_empty() { None } else { Some(map) }
}

/// Parse an SSE stream into decoded chat events.
fn parse_sse_stream(
    stream: impl futures_util::Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin,
) -> impl futures_util::Stream<Item = ChatEvent> {
    async_stream::stream! {
        let mut buffer = String::new();
        let mut stream = stream;

        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(err) => {
                    logging::warn(format!("SSE stream chunk error: {err}"));
                    continue;
                }
            };
            let s = String::from_utf8_lossy(&chunk);
            buffer.push_str(&s);

            while let Some(pos) = buffer.find("\n\n") {
                let block = buffer[..pos].to_string();
                buffer.drain(..pos + 2);

                for line in block.lines() {
                    if let Some(data) = line.strip_prefix("data: ") {
                        if data == "[DONE]" {
                            return;
                        }
                        match serde_json::from_str::<Value>(data) {
                            Ok(value) => yield ChatEvent::from_value(value),
                            Err(err) => {
                                logging::warn(format!("Failed to parse SSE event: {err}"));
                                logging::warn(format!("Raw SSE data: {data}"));
                            }
                        }
                    }
                }
            }
        }
    }
}
