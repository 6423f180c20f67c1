//! Groups service client.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{Group, GroupsPage, PageMetadata, Response};
use magistrala_sdk_core::DomainError;
use url::Url;

/// Client for the group hierarchy of a domain.
#[derive(Debug, Clone)]
pub struct Groups {
    executor: Executor,
    base: Url,
}

impl Groups {
    /// Create a client for the groups service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Create a group, optionally under `group.parent_id`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create(
        &self,
        domain_id: &str,
        group: &Group,
        token: &str,
    ) -> Result<Group, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups"], None)?;
        self.send(RequestSpec::post(url).json(group)?, token).await
    }

    /// Retrieve a group.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn get(
        &self,
        domain_id: &str,
        group_id: &str,
        token: &str,
    ) -> Result<Group, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups", group_id], None)?;
        self.send(RequestSpec::get(url), token).await
    }

    /// List groups.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(
        &self,
        domain_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<GroupsPage, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups"], Some(&pm.to_query()))?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Ancestors of a group, up to `pm.level` levels.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn parents(
        &self,
        domain_id: &str,
        group_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<GroupsPage, DomainError> {
        let url = endpoint(
            &self.base,
            [domain_id, "groups", group_id, "parents"],
            Some(&pm.to_query()),
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Descendants of a group, down to `pm.level` levels.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn children(
        &self,
        domain_id: &str,
        group_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<GroupsPage, DomainError> {
        let url = endpoint(
            &self.base,
            [domain_id, "groups", group_id, "children"],
            Some(&pm.to_query()),
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Update name, description and metadata.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update(
        &self,
        domain_id: &str,
        group_id: &str,
        group: &Group,
        token: &str,
    ) -> Result<Group, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups", group_id], None)?;
        self.send(RequestSpec::put(url).json(group)?, token).await
    }

    /// Enable a group.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn enable(
        &self,
        domain_id: &str,
        group_id: &str,
        token: &str,
    ) -> Result<Group, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups", group_id, "enable"], None)?;
        self.send(RequestSpec::post(url), token).await
    }

    /// Disable a group.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn disable(
        &self,
        domain_id: &str,
        group_id: &str,
        token: &str,
    ) -> Result<Group, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups", group_id, "disable"], None)?;
        self.send(RequestSpec::post(url), token).await
    }

    /// Delete a group.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn delete(
        &self,
        domain_id: &str,
        group_id: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "groups", group_id], None)?;
        self.executor
            .run_ack(
                RequestSpec::delete(url).credential(Credential::bearer(token)),
                "Group deleted successfully",
            )
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
