//! Channels service client.

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{Channel, ChannelsPage, Connection, PageMetadata, Response};
use magistrala_sdk_core::DomainError;
use url::Url;

/// Client for message channels and their thing connections.
#[derive(Debug, Clone)]
pub struct Channels {
    executor: Executor,
    base: Url,
}

impl Channels {
    /// Create a client for the channels service at `base`.
    #[must_use]
    pub fn new(executor: Executor, base: Url) -> Self {
        Self { executor, base }
    }

    /// Create a channel.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create(
        &self,
        domain_id: &str,
        channel: &Channel,
        token: &str,
    ) -> Result<Channel, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels"], None)?;
        self.send(RequestSpec::post(url).json(channel)?, token).await
    }

    /// Create several channels in one call.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn create_bulk(
        &self,
        domain_id: &str,
        channels: &[Channel],
        token: &str,
    ) -> Result<ChannelsPage, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", "bulk"], None)?;
        self.send(RequestSpec::post(url).json(channels)?, token).await
    }

    /// Retrieve a channel.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn get(
        &self,
        domain_id: &str,
        channel_id: &str,
        token: &str,
    ) -> Result<Channel, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", channel_id], None)?;
        self.send(RequestSpec::get(url), token).await
    }

    /// List channels.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn list(
        &self,
        domain_id: &str,
        pm: &PageMetadata,
        token: &str,
    ) -> Result<ChannelsPage, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels"], Some(&pm.to_query()))?;
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
        channel_id: &str,
        channel: &Channel,
        token: &str,
    ) -> Result<Channel, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", channel_id], None)?;
        self.send(RequestSpec::patch(url).json(channel)?, token).await
    }

    /// Enable a channel.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn enable(
        &self,
        domain_id: &str,
        channel_id: &str,
        token: &str,
    ) -> Result<Channel, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", channel_id, "enable"], None)?;
        self.send(RequestSpec::post(url), token).await
    }

    /// Disable a channel.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn disable(
        &self,
        domain_id: &str,
        channel_id: &str,
        token: &str,
    ) -> Result<Channel, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", channel_id, "disable"], None)?;
        self.send(RequestSpec::post(url), token).await
    }

    /// Delete a channel.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn delete(
        &self,
        domain_id: &str,
        channel_id: &str,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", channel_id], None)?;
        self.ack(RequestSpec::delete(url), token, "Channel deleted successfully")
            .await
    }

    /// Allow things to publish and/or subscribe on channels.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn connect(
        &self,
        domain_id: &str,
        connection: &Connection,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", "connect"], None)?;
        self.ack(
            RequestSpec::post(url).json(connection)?,
            token,
            "Things connected successfully",
        )
        .await
    }

    /// Remove thing connections.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn disconnect(
        &self,
        domain_id: &str,
        connection: &Connection,
        token: &str,
    ) -> Result<Response, DomainError> {
        let url = endpoint(&self.base, [domain_id, "channels", "disconnect"], None)?;
        self.ack(
            RequestSpec::post(url).json(connection)?,
            token,
            "Things disconnected successfully",
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
