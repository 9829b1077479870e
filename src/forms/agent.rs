//! Agent configuration form.

use serde_json::json;

use crate::client::PlatformClient;
use crate::forms::{FieldErrors, FormError, ListView, Submitted, limit, require, submit_error};
use crate::modules::agents;

const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Default)]
pub struct AgentForm {
    pub name: String,
    pub description: String,
    pub model_instance_id: String,
    pub mcp_server_ids: Vec<String>,
    errors: FieldErrors,
}

impl AgentForm {
    #[must_use]
    pub fn new(
        name: String,
        description: String,
        model_instance_id: String,
        mcp_server_ids: Vec<String>,
    ) -> Self {
        Self {
            name,
            description,
            model_instance_id,
            mcp_server_ids,
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
        require(&mut self.errors, "model_instance_id", &self.model_instance_id);
        limit(
            &mut self.errors,
            "description",
            &self.description,
            DESCRIPTION_MAX,
        );
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, client: &PlatformClient) -> Result<Submitted, FormError> {
        if !self.validate() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let mut payload = json!({
            "name": self.name,
            "model_instance_id": self.model_instance_id,
            "mcp_server_ids": self.mcp_server_ids,
        });
        if !self.description.trim().is_empty() {
            payload["description"] = json!(self.description);
        }

        match agents::create(client, &payload).await {
            Ok(created) => Ok(Submitted {
                id: Some(created.id),
                refresh: ListView::Agents,
            }),
            Err(err) => Err(submit_error(err, &mut self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_instance_is_required() {
        let mut form = AgentForm {
            name: "helper".to_string(),
            ..AgentForm::default()
        };
        assert!(!form.validate());
        assert!(form.errors().get("model_instance_id").is_some());

        form.model_instance_id = "m1".to_string();
        assert!(form.validate());
    }
}
