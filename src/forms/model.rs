//! Model instance form.
//!
//! The model field depends on the selected provider: changing the provider
//! changes the domain of valid models, so the current selection is cleared
//! whenever the provider changes. A stale model from a previous provider is
//! never submittable.

use serde_json::json;

use crate::client::PlatformClient;
use crate::forms::{FieldErrors, FormError, ListView, Submitted, limit, require, submit_error};
use crate::modules::models;

const NAME_MAX: usize = 100;

#[derive(Debug, Default)]
pub struct ModelForm {
    provider_id: String,
    pub model_name: String,
    pub display_name: String,
    errors: FieldErrors,
}

impl ModelForm {
    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Select the parent provider. Switching providers clears the dependent
    /// model selection.
    pub fn set_provider(&mut self, provider_id: impl Into<String>) {
        let provider_id = provider_id.into();
        if provider_id != self.provider_id {
            self.model_name.clear();
        }
        self.provider_id = provider_id;
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        require(&mut self.errors, "provider_id", &self.provider_id);
        require(&mut self.errors, "model_name", &self.model_name);
        limit(&mut self.errors, "display_name", &self.display_name, NAME_MAX);
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, client: &PlatformClient) -> Result<Submitted, FormError> {
        if !self.validate() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let mut payload = json!({
            "provider_id": self.provider_id,
            "model_name": self.model_name,
        });
        if !self.display_name.trim().is_empty() {
            payload["name"] = json!(self.display_name);
        }

        match models::create(client, &payload).await {
            Ok(created) => Ok(Submitted {
                id: Some(created.id),
                refresh: ListView::Models,
            }),
            Err(err) => Err(submit_error(err, &mut self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_provider_clears_dependent_model() {
        let mut form = ModelForm::default();
        form.set_provider("provider-a");
        form.model_name = "model-x".to_string();

        form.set_provider("provider-b");

        assert_eq!(form.model_name, "");
        assert_eq!(form.provider_id(), "provider-b");
    }

    #[test]
    fn reselecting_same_provider_keeps_model() {
        let mut form = ModelForm::default();
        form.set_provider("provider-a");
        form.model_name = "model-x".to_string();

        form.set_provider("provider-a");

        assert_eq!(form.model_name, "model-x");
    }

    #[test]
    fn cleared_model_blocks_submission() {
        let mut form = ModelForm::default();
        form.set_provider("provider-a");
        form.model_name = "model-x".to_string();
        form.set_provider("provider-b");

        assert!(!form.validate());
        assert!(form.errors().get("model_name").is_some());
    }
}
