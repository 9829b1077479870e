//! Provider configuration form.

use serde_json::json;
use zeroize::Zeroize;

use crate::client::PlatformClient;
use crate::forms::{
    FieldErrors, FormError, ListView, Submitted, check_url, limit, require, submit_error,
};
use crate::modules::providers;

const NAME_MAX: usize = 100;

#[derive(Debug, Default)]
pub struct ProviderForm {
    pub name: String,
    pub provider_type: String,
    pub base_url: String,
    /// Sensitive; cleared from the draft after a successful submission.
    pub api_key: String,
    errors: FieldErrors,
}

impl ProviderForm {
    #[must_use]
    pub fn new(name: String, provider_type: String, base_url: String, api_key: String) -> Self {
        Self {
            name,
            provider_type,
            base_url,
            api_key,
            errors: FieldErrors::default(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Run client-side validation. Returns true when the form is clean.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        require(&mut self.errors, "name", &self.name);
        limit(&mut self.errors, "name", &self.name, NAME_MAX);
        require(&mut self.errors, "provider_type", &self.provider_type);
        require(&mut self.errors, "api_key", &self.api_key);
        check_url(&mut self.errors, "base_url", &self.base_url);
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, client: &PlatformClient) -> Result<Submitted, FormError> {
        if !self.validate() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let mut payload = json!({
            "name": self.name,
            "provider_type": self.provider_type,
            "api_key": self.api_key,
        });
        if !self.base_url.trim().is_empty() {
            payload["base_url"] = json!(self.base_url);
        }

        match providers::create(client, &payload).await {
            Ok(created) => {
                self.api_key.zeroize();
                Ok(Submitted {
                    id: Some(created.id),
                    refresh: ListView::Providers,
                })
            }
            Err(err) => Err(submit_error(err, &mut self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Session;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: String) -> PlatformClient {
        let session = Session {
            api_url: base_url,
            api_token: "test".to_string(),
            workspace: "default".to_string(),
            storage_url: None,
        };
        PlatformClient::new(session).expect("create client")
    }

    fn filled_form() -> ProviderForm {
        ProviderForm {
            name: "openai-main".to_string(),
            provider_type: "openai".to_string(),
            base_url: String::new(),
            api_key: "sk-secret".to_string(),
            ..ProviderForm::default()
        }
    }

    #[test]
    fn validation_blocks_submission_on_missing_fields() {
        let mut form = ProviderForm::default();
        assert!(!form.validate());
        assert!(form.errors().get("name").is_some());
        assert!(form.errors().get("api_key").is_some());
    }

    #[tokio::test]
    async fn success_clears_api_key_and_requests_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "p1",
                "name": "openai-main",
                "provider_type": "openai"
            })))
            .mount(&server)
            .await;

        let mut form = filled_form();
        let submitted = form.submit(&client_for(server.uri())).await.expect("submit");
        assert_eq!(submitted.id.as_deref(), Some("p1"));
        assert_eq!(submitted.refresh, ListView::Providers);
        assert!(form.api_key.is_empty());
        // Non-sensitive values survive for a follow-up edit.
        assert_eq!(form.name, "openai-main");
    }

    #[tokio::test]
    async fn server_field_errors_land_on_the_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/providers"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "errors": { "name": "name already taken" }
            })))
            .mount(&server)
            .await;

        let mut form = filled_form();
        let err = form.submit(&client_for(server.uri())).await.unwrap_err();
        match err {
            FormError::Invalid(errors) => {
                assert_eq!(errors.get("name"), Some("name already taken"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        // Entered values are preserved on failure, api_key included.
        assert_eq!(form.api_key, "sk-secret");
    }

    #[tokio::test]
    async fn non_validation_failure_preserves_values() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/providers"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"detail": "database down"})),
            )
            .mount(&server)
            .await;

        let mut form = filled_form();
        let err = form.submit(&client_for(server.uri())).await.unwrap_err();
        match err {
            FormError::Api(message) => assert!(message.contains("database down")),
            other => panic!("expected Api, got {other:?}"),
        }
        assert_eq!(form.name, "openai-main");
        assert_eq!(form.api_key, "sk-secret");
    }
}
