//! Data source form.

use serde_json::json;

use crate::client::PlatformClient;
use crate::forms::{FieldErrors, FormError, ListView, Submitted, limit, require, submit_error};
use crate::modules::sources;

const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Default)]
pub struct SourceForm {
    pub name: String,
    pub source_type: String,
    pub description: String,
    errors: FieldErrors,
}

impl SourceForm {
    #[must_use]
    pub fn new(name: String, source_type: String, description: String) -> Self {
        Self {
            name,
            source_type,
            description,
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
        require(&mut self.errors, "source_type", &self.source_type);
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
            "source_type": self.source_type,
        });
        if !self.description.trim().is_empty() {
            payload["description"] = json!(self.description);
        }

        match sources::create(client, &payload).await {
            Ok(created) => Ok(Submitted {
                id: Some(created.id),
                refresh: ListView::Sources,
            }),
            Err(err) => Err(submit_error(err, &mut self.errors)),
        }
    }
}
