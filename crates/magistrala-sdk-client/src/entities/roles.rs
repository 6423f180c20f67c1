//! Role management shared by every entity kind that supports roles.
//!
//! The same routes exist under domains, things, channels and groups, so the
//! service base URL and the entity endpoint are passed per call:
//!
//! | entity | base | endpoint |
//! |---|---|---|
//! | domain | domains service | `domains` |
//! | thing | things service | `{domainId}/things` |
//! | channel | channels service | `{domainId}/channels` |
//! | group | groups service | `{domainId}/groups` |

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{AvailableActions, PageMetadata, Response, Role, RolesPage};
use magistrala_sdk_core::DomainError;
use serde::Serialize;
use url::Url;

#[derive(Serialize)]
struct NewRole<'a> {
    role_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional_actions: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional_members: Option<&'a [String]>,
}

/// Client for entity roles.
#[derive(Debug, Clone)]
pub struct Roles {
    executor: Executor,
}

/// Split an entity endpoint such as `d1/things` into path segments.
fn segments<'a>(entity_endpoint: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    entity_endpoint
        .split('/')
        .filter(|s| !s.is_empty())
        .chain(rest.iter().copied())
        .collect()
}

impl Roles {
    /// Create a roles client.
    #[must_use]
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Actions that can be granted on this entity kind.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list_available_actions(
        &self,
        base: &Url,
        entity_endpoint: &str,
        token: &str,
    ) -> Result<AvailableActions, DomainError> {
        let url = endpoint(
            base,
            segments(entity_endpoint, &["roles", "available-actions"]),
            None,
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Create a role on an entity.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        base: &Url,
        entity_endpoint: &str,
        entity_id: &str,
        role_name: &str,
        optional_actions: Option<&[String]>,
        optional_members: Option<&[String]>,
        token: &str,
    ) -> Result<Role, DomainError> {
        let url = endpoint(base, segments(entity_endpoint, &[entity_id, "roles"]), None)?;
        let body = NewRole {
            role_name,
            optional_actions,
            optional_members,
        };
        self.send(RequestSpec::post(url).json(&body)?, token).await
    }

    /// List roles of an entity.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(
        &self,
        base: &Url,
        entity_endpoint: &str,
        entity_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<RolesPage, DomainError> {
        let url = endpoint(
            base,
            segments(entity_endpoint, &[entity_id, "roles"]),
            Some(&pm.to_query()),
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Retrieve a role by name.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn view(
        &self,
        base: &Url,
        entity_endpoint: &str,
        entity_id: &str,
        role_name: &str,
        token: &str,
    ) -> Result<Role, DomainError> {
        let url = endpoint(
            base,
            segments(entity_endpoint, &[entity_id, "roles", role_name]),
            None,
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Replace a role.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update(
        &self,
        base: &Url,
        entity_endpoint: &str,
        entity_id: &str,
        role_name: &str,
        role: &Role,
        token: &str,
    ) -> Result<Role, DomainError> {
        let url = endpoint(
            base,
            segments(entity_endpoint, &[entity_id, "roles", role_name]),
            None,
        )?;
        self.send(RequestSpec::put(url).json(role)?, token).await
    }

    /// Delete a role.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn delete(
        &self,
        base: &Url,
        entity_endpoint: &str,
        entity_id: &str,
        role_name: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(
            base,
            segments(entity_endpoint, &[entity_id, "roles", role_name]),
            None,
        )?;
        self.executor
            .run_ack(
                RequestSpec::delete(url).credential(Credential::bearer(token)),
                "Role deleted successfully",
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
