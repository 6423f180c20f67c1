//! # Magistrala SDK Client
//!
//! HTTP request executor and entity clients for the Magistrala IoT platform.
//!
//! ## Layout
//!
//! - [`executor`]: issues one HTTP call and normalizes every failure into a
//!   [`DomainError`]
//! - [`entities`]: users, things, channels, groups, domains, roles, messages,
//!   certs and bootstrap clients built on the executor
//! - [`config`]: per-service base URLs and TLS options
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use magistrala_sdk_client::{Sdk, SdkConfig};
//!
//! let sdk = Sdk::new(SdkConfig::with_host("http://localhost"))?;
//! sdk.messages
//!     .send("chan1.temp", r#"[{"n":"t","v":21.5}]"#, "thing-secret")
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod credential;
pub mod entities;
pub mod executor;

pub use config::{ConfigError, SdkConfig, TlsConfig};
pub use credential::Credential;
pub use entities::{Bootstrap, Certs, Channels, Domains, Groups, Messages, Roles, Things, Users};
pub use executor::{endpoint, Executor, RequestSpec};
pub use magistrala_sdk_core::{DomainError, ErrorKind};

use config::parse_base_url;
use url::Url;

/// Every entity client wired to one configuration.
#[derive(Debug, Clone)]
pub struct Sdk {
    /// Users and authentication
    pub users: Users,
    /// Devices
    pub things: Things,
    /// Message channels and thing connections
    pub channels: Channels,
    /// Group hierarchy
    pub groups: Groups,
    /// Domains and invitations
    pub domains: Domains,
    /// Roles of domains, things, channels and groups
    pub roles: Roles,
    /// Telemetry send and read
    pub messages: Messages,
    /// Thing certificates
    pub certs: Certs,
    /// Device bootstrap
    pub bootstrap: Bootstrap,
    config: SdkConfig,
}

impl Sdk {
    /// Build every client from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if a service URL is invalid or TLS material cannot be loaded.
    pub fn new(config: SdkConfig) -> Result<Self, ConfigError> {
        let executor = Executor::with_tls(&config.tls)?;
        Self::with_executor(config, executor)
    }

    /// Build every client around an existing executor.
    ///
    /// # Errors
    ///
    /// Returns error if a service URL is invalid.
    pub fn with_executor(config: SdkConfig, executor: Executor) -> Result<Self, ConfigError> {
        let base = |service: &str, raw: &str| parse_base_url(service, raw);

        let sdk = Self {
            users: Users::new(executor.clone(), base("users", &config.users_url)?),
            things: Things::new(executor.clone(), base("things", &config.things_url)?),
            channels: Channels::new(executor.clone(), base("channels", &config.channels_url)?),
            groups: Groups::new(executor.clone(), base("groups", &config.groups_url)?),
            domains: Domains::new(executor.clone(), base("domains", &config.domains_url)?),
            roles: Roles::new(executor.clone()),
            messages: Messages::new(
                executor.clone(),
                base("readers", &config.readers_url)?,
                base("http_adapter", &config.http_adapter_url)?,
            ),
            certs: Certs::new(executor.clone(), base("certs", &config.certs_url)?),
            bootstrap: Bootstrap::new(executor, base("bootstrap", &config.bootstrap_url)?),
            config,
        };

        tracing::debug!(users = %sdk.config.users_url, "SDK initialized");
        Ok(sdk)
    }

    /// Configuration the clients were built from.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Parsed base URL of a service by name, as listed in [`SdkConfig::services`].
    ///
    /// Roles operations take the base of the entity they act on, e.g.
    /// `sdk.service_url("things")`.
    #[must_use]
    pub fn service_url(&self, service: &str) -> Option<Url> {
        self.config
            .services()
            .into_iter()
            .find(|(name, _)| *name == service)
            .and_then(|(name, raw)| parse_base_url(name, raw).ok())
    }
}
