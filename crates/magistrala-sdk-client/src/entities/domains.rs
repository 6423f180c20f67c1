//! Domains service client.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{
    Domain, DomainsPage, InvitationsPage, PageMetadata, Permissions, Relation, Response,
};
use magistrala_sdk_core::DomainError;
use serde_json::json;
use url::Url;

/// Client for tenant domains and domain invitations.
#[derive(Debug, Clone)]
pub struct Domains {
    executor: Executor,
    base: Url,
}

impl Domains {
    /// Create a client for the domains service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Create a domain. The caller becomes its administrator.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create(&self, domain: &Domain, token: &str) -> Result<Domain, DomainError> {
        let url = endpoint(&self.base, ["domains"], None)?;
        self.send(RequestSpec::post(url).json(domain)?, token).await
    }

    /// Retrieve a domain.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn get(&self, domain_id: &str, token: &str) -> Result<Domain, DomainError> {
        let url = endpoint(&self.base, ["domains", domain_id], None)?;
        self.send(RequestSpec::get(url), token).await
    }

    /// List domains the caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(&self, pm: &PageMetadata, token: &str) -> Result<DomainsPage, DomainError> {
        let url = endpoint(&self.base, ["domains"], Some(&pm.to_query()))?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Update name, tags and metadata.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update(
        &self,
        domain_id: &str,
        domain: &Domain,
        token: &str,
    ) -> Result<Domain, DomainError> {
        let url = endpoint(&self.base, ["domains", domain_id], None)?;
        self.send(RequestSpec::patch(url).json(domain)?, token).await
    }

    /// Permissions the caller holds on a domain.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn permissions(
        &self,
        domain_id: &str,
        token: &str,
    ) -> Result<Permissions, DomainError> {
        let url = endpoint(&self.base, ["domains", domain_id, "permissions"], None)?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Enable a domain.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn enable(&self, domain_id: &str, token: &str) -> Result<Response, DomainError> {
        self.transition(domain_id, "enable", token, "Domain enabled successfully")
            .await
    }

    /// Disable a domain.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn disable(&self, domain_id: &str, token: &str) -> Result<Response, DomainError> {
        self.transition(domain_id, "disable", token, "Domain disabled successfully")
            .await
    }

    /// Freeze a domain. Platform administrators only.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn freeze(&self, domain_id: &str, token: &str) -> Result<Response, DomainError> {
        self.transition(domain_id, "freeze", token, "Domain frozen successfully")
            .await
    }

    /// Invite a user into a domain with the given relation.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn send_invitation(
        &self,
        domain_id: &str,
        user_id: &str,
        relation: Relation,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, ["domains", domain_id, "invitations"], None)?;
        let body = json!({ "user_id": user_id, "relation": relation });
        self.executor
            .run_ack(
                RequestSpec::post(url).credential(Credential::bearer(token)).json(&body)?,
                "Invitation sent successfully",
            )
            .await
    }

    /// List invitations of a domain.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list_invitations(
        &self,
        domain_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<InvitationsPage, DomainError> {
        let url = endpoint(
            &self.base,
            ["domains", domain_id, "invitations"],
            Some(&pm.to_query()),
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Accept a pending invitation as the invited user.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn accept_invitation(
        &self,
        domain_id: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, ["domains", domain_id, "invitations", "accept"], None)?;
        self.executor
            .run_ack(
                RequestSpec::post(url).credential(Credential::bearer(token)),
                "Invitation accepted successfully",
            )
            .await
    }

    async fn transition(
        &self,
        domain_id: &str,
        action: &str,
        token: &str,
        message: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, ["domains", domain_id, action], None)?;
        self.executor
            .run_ack(RequestSpec::post(url).credential(Credential::bearer(token)), message)
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
