//! Things service client.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{Identity, PageMetadata, Response, Thing, ThingsPage};
use magistrala_sdk_core::DomainError;
use serde_json::json;
use url::Url;

/// Client for devices registered in a domain.
#[derive(Debug, Clone)]
pub struct Things {
    executor: Executor,
    base: Url,
}

impl Things {
    /// Create a client for the things service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Create a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create(
        &self,
        domain_id: &str,
        thing: &Thing,
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things"], None)?;
        self.send(RequestSpec::post(url).json(thing)?, token).await
    }

    /// Create several things in one call.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create_bulk(
        &self,
        domain_id: &str,
        things: &[Thing],
        token: &str,
    ) -> Result<ThingsPage, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", "bulk"], None)?;
        self.send(RequestSpec::post(url).json(things)?, token).await
    }

    /// Retrieve a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn get(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id], None)?;
        self.send(RequestSpec::get(url), token).await
    }

    /// List things visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(
        &self,
        domain_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<ThingsPage, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things"], Some(&pm.to_query()))?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Update name and metadata.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update(
        &self,
        domain_id: &str,
        thing_id: &str,
        thing: &Thing,
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id], None)?;
        self.send(RequestSpec::patch(url).json(thing)?, token).await
    }

    /// Replace tags.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update_tags(
        &self,
        domain_id: &str,
        thing_id: &str,
        tags: &[String],
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id, "tags"], None)?;
        self.send(RequestSpec::patch(url).json(&json!({ "tags": tags }))?, token)
            .await
    }

    /// Rotate the thing secret.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update_secret(
        &self,
        domain_id: &str,
        thing_id: &str,
        secret: &str,
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id, "secret"], None)?;
        self.send(RequestSpec::patch(url).json(&json!({ "secret": secret }))?, token)
            .await
    }

    /// Enable a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn enable(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id, "enable"], None)?;
        self.send(RequestSpec::post(url), token).await
    }

    /// Disable a thing. Disabled things cannot publish.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn disable(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<Thing, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id, "disable"], None)?;
        self.send(RequestSpec::post(url), token).await
    }

    /// Delete a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn delete(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", thing_id], None)?;
        self.executor
            .run_ack(
                RequestSpec::delete(url).credential(Credential::bearer(token)),
                "Thing deleted successfully",
            )
            .await
    }

    /// Resolve the thing that owns `thing_secret`.
    ///
    /// Authenticates as the device itself.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn identify(&self, thing_secret: &str) -> Result<Identity, DomainError> {
        let url = endpoint(&self.base, ["identify"], None)?;
        self.executor
            .run_json(RequestSpec::post(url).credential(Credential::thing(thing_secret)))
            .await
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        spec: RequestSpec,
        token: &str,
    ) -> Result<T, DomainError> {
        self.executor
            .run_json(spec.credential(Credential::bearer(token)))
            .await
    }
}
