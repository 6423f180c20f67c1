//! Bootstrap service client.
//!
//! Operators manage configs with a user token. Devices fetch their own
//! config with `Authorization: Thing <external_key>`.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{BootstrapConfig, BootstrapPage, PageMetadata, Response};
use magistrala_sdk_core::DomainError;
use serde::Serialize;
use serde_json::json;
use url::Url;

#[derive(Serialize)]
struct ConfigUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

/// Client for device bootstrap configurations.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    executor: Executor,
    base: Url,
}

impl Bootstrap {
    /// Create a client for the bootstrap service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Register a bootstrap config.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn add(
        &self,
        domain_id: &str,
        config: &BootstrapConfig,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", "configs"], None)?;
        self.ack(RequestSpec::post(url).json(config)?, token, "Configuration added")
            .await
    }

    /// Retrieve the config of a thing.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn view(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<BootstrapConfig, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", "configs", thing_id], None)?;
        self.send(RequestSpec::get(url), token).await
    }

    /// List configs.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(
        &self,
        domain_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<BootstrapPage, DomainError> {
        let url = endpoint(
            &self.base,
            [domain_id, "things", "configs"],
            Some(&pm.to_query()),
        )?;
        self.send(RequestSpec::get(url), token).await
    }

    /// Update name and content of a config.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `config.thing_id` is missing, otherwise the
    /// normalized error of the call.
    pub async fn update(
        &self,
        domain_id: &str,
        config: &BootstrapConfig,
        token: &str,
    ) -> Result<Response, DomainError> {
        let thing_id = config
            .thing_id
            .as_deref()
            .ok_or_else(|| DomainError::invalid_request("thing id is required"))?;
        let url = endpoint(&self.base, [domain_id, "things", "configs", thing_id], None)?;
        let body = ConfigUpdate {
            name: config.name.as_deref(),
            content: config.content.as_deref(),
        };
        self.ack(RequestSpec::put(url).json(&body)?, token, "Configuration updated")
            .await
    }

    /// Replace the certificates carried by a config.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update_certs(
        &self,
        domain_id: &str,
        thing_id: &str,
        client_cert: &str,
        client_key: &str,
        ca_cert: &str,
        token: &str,
    ) -> Result<BootstrapConfig, DomainError> {
        let url = endpoint(
            &self.base,
            [domain_id, "things", "configs", "certs", thing_id],
            None,
        )?;
        let body = json!({
            "client_cert": client_cert,
            "client_key": client_key,
            "ca_cert": ca_cert,
        });
        self.send(RequestSpec::patch(url).json(&body)?, token).await
    }

    /// Replace the channels a config connects to.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn update_connections(
        &self,
        domain_id: &str,
        thing_id: &str,
        channels: &[String],
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(
            &self.base,
            [domain_id, "things", "configs", "connections", thing_id],
            None,
        )?;
        self.ack(
            RequestSpec::put(url).json(&json!({ "channels": channels }))?,
            token,
            "Configuration connections updated",
        )
        .await
    }

    /// Remove a config.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn remove(
        &self,
        domain_id: &str,
        thing_id: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", "configs", thing_id], None)?;
        self.ack(RequestSpec::delete(url), token, "Configuration removed")
            .await
    }

    /// Activate (`1`) or deactivate (`0`) a config.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn whitelist(
        &self,
        domain_id: &str,
        thing_id: &str,
        state: u8,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "things", "state", thing_id], None)?;
        self.ack(
            RequestSpec::put(url).json(&json!({ "state": state }))?,
            token,
            "Configuration state updated",
        )
        .await
    }

    /// Fetch a config as the device, using its external credentials.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn bootstrap(
        &self,
        external_id: &str,
        external_key: &str,
    ) -> Result<BootstrapConfig, DomainError> {
        let url = endpoint(&self.base, ["things", "bootstrap", external_id], None)?;
        self.executor
            .run_json(RequestSpec::get(url).credential(Credential::thing(external_key)))
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

    async fn ack(
        &self,
        spec: RequestSpec,
        token: &str,
        message: &str,
    ) -> Result<Response, DomainError> {
        self.executor
            .run_ack(spec.credential(Credential::bearer(token)), message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_update_omits_absent_fields() {
        let body = ConfigUpdate {
            name: Some("gateway"),
            content: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"name": "gateway"})
        );
    }
}
