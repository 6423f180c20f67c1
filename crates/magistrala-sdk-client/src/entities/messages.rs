//! Telemetry ingestion and retrieval.
//!
//! Both operations address a channel through a composite
//! `<channelId>[.<subtopic>]` string, decoded with [`ResourceAddress`]:
//!
//! - send: `POST {http_adapter}/channels/{id}/messages/{subtopic...}`,
//!   authenticated with the thing secret
//! - read: `GET {readers}/{domainId}/channels/{id}/messages/{subtopic...}?{filter}`,
//!   authenticated with a user token

use crate::credential::Credential;
use crate::executor::{endpoint, Executor, RequestSpec};
use magistrala_sdk_core::defs::{MessagesPage, MessagesPageMetadata, Response};
use magistrala_sdk_core::{DomainError, ResourceAddress};
use url::Url;

/// Client for sending and reading channel messages.
#[derive(Debug, Clone)]
pub struct Messages {
    executor: Executor,
    readers_url: Url,
    http_adapter_url: Url,
}

impl Messages {
    /// Create a messages client.
    #[must_use]
    pub fn new(executor: Executor, readers_url: Url, http_adapter_url: Url) -> Self {
        Self {
            executor,
            readers_url,
            http_adapter_url,
        }
    }

    /// Publish a message as a device.
    ///
    /// `payload` is forwarded byte for byte, e.g. a SenML array:
    /// `[{"bn":"demo","bu":"V","n":"voltage","u":"V","v":5}]`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn send(
        &self,
        channel: &str,
        payload: impl Into<Vec<u8>>,
        thing_secret: &str,
    ) -> Result<Response, DomainError> {
        let address = ResourceAddress::decode(channel);
        let url = endpoint(
            &self.http_adapter_url,
            ["channels", address.id.as_str(), "messages"]
                .into_iter()
                .chain(address.path_segments()),
            None,
        )?;

        tracing::debug!(channel = %address, "Publishing message");

        self.executor
            .run_ack(
                RequestSpec::post(url)
                    .credential(Credential::thing(thing_secret))
                    .raw_body(payload),
                "Message sent successfully",
            )
            .await
    }

    /// Read stored messages of a channel.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn read(
        &self,
        domain_id: &str,
        channel: &str,
        pm: &MessagesPageMetadata,
        token: &str,
    ) -> Result<MessagesPage, DomainError> {
        let address = ResourceAddress::decode(channel);
        let url = endpoint(
            &self.readers_url,
            [domain_id, "channels", address.id.as_str(), "messages"]
                .into_iter()
                .chain(address.path_segments()),
            Some(&pm.to_query()),
        )?;

        self.executor
            .run_json(RequestSpec::get(url).credential(Credential::bearer(token)))
            .await
    }
}
