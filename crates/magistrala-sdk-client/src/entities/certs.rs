//! Certificates service client.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{Cert, CertSerials, Response};
use magistrala_sdk_core::DomainError;
use serde_json::json;
use url::Url;

/// Client for X.509 certificates of things.
#[derive(Debug, Clone)]
pub struct Certs {
    executor: Executor,
    base: Url,
}

impl Certs {
    /// Create a client for the certs service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Issue a certificate for a thing, valid for `ttl` (e.g. `"8760h"`).
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn issue(
        &self,
        domain_id: &str,
        thing_id: &str,
        ttl: &str,
        token: &str,
    ) -> Result<Cert, DomainError> {
        let url = endpoint(&self.base, [domain_id, "certs"], None)?;
        let body = json!({ "thing_id": thing_id, "ttl": ttl });
        self.executor
            .run_json(RequestSpec::post(url).credential(Credential::bearer(token)).json(&body)?)
            .await
    }

    /// Retrieve a certificate by serial.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn view(
        &self,
        domain_id: &str,
        serial: &str,
        token: &str,
    ) -> Result<Cert, DomainError> {
        let url = endpoint(&self.base, [domain_id, "certs", serial], None)?;
        self.executor
            .run_json(RequestSpec::get(url).credential(Credential::bearer(token)))
            .await
    }

    /// Serials of every certificate issued to a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn view_by_thing(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<CertSerials, DomainError> {
        let url = endpoint(&self.base, [domain_id, "serials", thing_id], None)?;
        self.executor
            .run_json(RequestSpec::get(url).credential(Credential::bearer(token)))
            .await
    }

    /// Revoke every certificate of a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn revoke(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "certs", thing_id], None)?;
        self.executor
            .run_ack(
                RequestSpec::delete(url).credential(Credential::bearer(token)),
                "Certificate revoked successfully",
            )
            .await
    }
}
