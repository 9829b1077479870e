//! Test utilities for agentctl integration tests.

#![allow(dead_code)]

use agentctl::client::{PlatformClient, Session};

/// Build a client pointed at a mock server.
pub fn test_client(base_url: String) -> PlatformClient {
    test_client_with_storage(base_url, None)
}

/// Build a client pointed at a mock server with a public storage endpoint.
pub fn test_client_with_storage(base_url: String, storage_url: Option<String>) -> PlatformClient {
    let session = Session {
        api_url: base_url,
        api_token: "test-token".to_string(),
        workspace: "default".to_string(),
        storage_url,
    };
    PlatformClient::new(session).expect("create client")
}
