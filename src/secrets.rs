//! Secret operations.
//!
//! CRUD over named secrets. The API never returns secret values, only
//! identifiers and names, so reads here are metadata-only.

use serde::Deserialize;
use tracing::debug;

use crate::client::Client;
use crate::error::Result;
use crate::types::{CreateSecretRequest, ListOptions, Secret, UpdateSecretRequest};
use crate::validate;

impl Client {
    /// Creates a new secret.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name or value is empty, or an API
    /// error if the secret cannot be created.
    pub async fn create_secret(&self, name: &str, value: &str) -> Result<Secret> {
        validate::required_str("name", name)?;
        validate::required_str("value", value)?;

        let request = CreateSecretRequest {
            name: name.to_string(),
            value: value.to_string(),
        };
        self.post("/secrets", &request).await
    }

    /// Retrieves a secret's metadata by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the API call fails.
    pub async fn get_secret(&self, name: &str) -> Result<Secret> {
        validate::required_str("name", name)?;
        self.get(&format!("/secrets/{name}")).await
    }

    /// Replaces a secret's value.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name or value is empty, or an API
    /// error if the secret cannot be updated.
    pub async fn update_secret(&self, name: &str, value: &str) -> Result<Secret> {
        validate::required_str("name", name)?;
        validate::required_str("value", value)?;

        let request = UpdateSecretRequest {
            value: value.to_string(),
        };
        self.put(&format!("/secrets/{name}"), &request).await
    }

    /// Deletes a secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the API call fails.
    pub async fn delete_secret(&self, name: &str) -> Result<()> {
        validate::required_str("name", name)?;
        self.delete(&format!("/secrets/{name}")).await
    }

    /// Lists all secrets, optionally paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_secrets(&self, opts: Option<ListOptions>) -> Result<Vec<Secret>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            secrets: Vec<Secret>,
        }

        let endpoint = self.build_list_url("/secrets", opts);
        let response: Response = self.get(&endpoint).await?;
        Ok(response.secrets)
    }

    /// Creates a secret, or updates its value if one with the name exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name or value is empty, or an API
    /// error if neither the create nor the update succeeds.
    pub async fn create_or_update_secret(&self, name: &str, value: &str) -> Result<Secret> {
        validate::required_str("name", name)?;
        validate::required_str("value", value)?;

        match self.get_secret(name).await {
            Ok(_) => {
                debug!(name, "secret exists, updating value");
                self.update_secret(name, value).await
            }
            Err(err) if err.is_not_found() => {
                debug!(name, "secret does not exist, creating");
                self.create_secret(name, value).await
            }
            Err(err) => Err(err),
        }
    }
}
