//! MCP server registration form.

use serde_json::json;

use crate::client::PlatformClient;
use crate::forms::{
    FieldErrors, FormError, ListView, Submitted, check_url, limit, require, submit_error,
};
use crate::modules::mcp;

const NAME_MAX: usize = 100;

#[derive(Debug, Default)]
pub struct McpServerForm {
    pub name: String,
    pub url: String,
    pub transport: String,
    errors: FieldErrors,
}

impl McpServerForm {
    #[must_use]
    pub fn new(name: String, url: String, transport: String) -> Self {
        Self {
            name,
            url,
            transport,
            errors: FieldErrors::default(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        require(&mut self.errors, "name", &self.name);
        limit(&mut self.errors, "name", &self.name, NAME_MAX);
        require(&mut self.errors, "url", &self.url);
        check_url(&mut self.errors, "url", &self.url);
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, client: &PlatformClient) -> Result<Submitted, FormError> {
        if !self.validate() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let mut payload = json!({
            "name": self.name,
            "url": self.url,
        });
        if !self.transport.trim().is_empty() {
            payload["transport"] = json!(self.transport);
        }

        match mcp::create(client, &payload).await {
            Ok(created) => Ok(Submitted {
                id: Some(created.id),
                refresh: ListView::McpServers,
            }),
            Err(err) => Err(submit_error(err, &mut self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_shape_is_enforced() {
        let mut form = McpServerForm {
            name: "tools".to_string(),
            url: "not-a-url".to_string(),
            ..McpServerForm::default()
        };
        assert!(!form.validate());
        assert!(form.errors().get("url").is_some());

        form.url = "https://mcp.example.com/sse".to_string();
        assert!(form.validate());
    }
}
