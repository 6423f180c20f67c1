//! SDK configuration.
//!
//! Each platform service is reached through its own base URL. The values are
//! fixed once an [`crate::Sdk`] is built; several differently configured SDK
//! instances can live in one process.

use std::path::PathBuf;
use url::Url;

/// Base URLs of the platform services plus transport options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkConfig {
    /// Users service
    pub users_url: String,
    /// Things service
    pub things_url: String,
    /// Channels service
    pub channels_url: String,
    /// Groups service
    pub groups_url: String,
    /// Domains service
    pub domains_url: String,
    /// Message readers service
    pub readers_url: String,
    /// HTTP protocol adapter used for telemetry ingestion
    pub http_adapter_url: String,
    /// Certificates service
    pub certs_url: String,
    /// Bootstrap service
    pub bootstrap_url: String,
    /// TLS options for HTTPS deployments
    pub tls: TlsConfig,
}

/// TLS options used when talking to `https://` services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// Custom CA certificate for self-signed deployments (PEM format)
    pub ca_cert_path: Option<PathBuf>,
    /// Client certificate for mTLS (PEM format)
    pub client_cert_path: Option<PathBuf>,
    /// Client private key for mTLS (PEM format)
    pub client_key_path: Option<PathBuf>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            users_url: "http://localhost:9002".to_string(),
            things_url: "http://localhost:9000".to_string(),
            channels_url: "http://localhost:9005".to_string(),
            groups_url: "http://localhost:9004".to_string(),
            domains_url: "http://localhost:8189".to_string(),
            readers_url: "http://localhost:9011".to_string(),
            http_adapter_url: "http://localhost:8008/http".to_string(),
            certs_url: "http://localhost:9019".to_string(),
            bootstrap_url: "http://localhost:9013".to_string(),
            tls: TlsConfig::default(),
        }
    }
}

impl SdkConfig {
    /// Route every service through a single host, e.g. an API gateway.
    #[must_use]
    pub fn with_host(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            users_url: host.clone(),
            things_url: host.clone(),
            channels_url: host.clone(),
            groups_url: host.clone(),
            domains_url: host.clone(),
            readers_url: host.clone(),
            http_adapter_url: host.clone(),
            certs_url: host.clone(),
            bootstrap_url: host,
            tls: TlsConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MG_HOST_URL`: base for every service not set individually
    /// - `MG_USERS_URL`, `MG_THINGS_URL`, `MG_CHANNELS_URL`, `MG_GROUPS_URL`,
    ///   `MG_DOMAINS_URL`, `MG_READERS_URL`, `MG_HTTP_ADAPTER_URL`,
    ///   `MG_CERTS_URL`, `MG_BOOTSTRAP_URL`: per-service base URLs
    /// - `MG_CA_CERT`, `MG_CLIENT_CERT`, `MG_CLIENT_KEY`: TLS material
    ///
    /// # Errors
    ///
    /// Returns error if any resulting URL fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("MG_HOST_URL") {
            Some(host) => Self::with_host(host),
            None => Self::default(),
        };

        let fields: [(&str, &mut String); 9] = [
            ("MG_USERS_URL", &mut config.users_url),
            ("MG_THINGS_URL", &mut config.things_url),
            ("MG_CHANNELS_URL", &mut config.channels_url),
            ("MG_GROUPS_URL", &mut config.groups_url),
            ("MG_DOMAINS_URL", &mut config.domains_url),
            ("MG_READERS_URL", &mut config.readers_url),
            ("MG_HTTP_ADAPTER_URL", &mut config.http_adapter_url),
            ("MG_CERTS_URL", &mut config.certs_url),
            ("MG_BOOTSTRAP_URL", &mut config.bootstrap_url),
        ];
        for (var, field) in fields {
            if let Some(value) = lookup(var) {
                *field = value;
            }
        }

        config.tls.ca_cert_path = lookup("MG_CA_CERT").map(PathBuf::from);
        config.tls.client_cert_path = lookup("MG_CLIENT_CERT").map(PathBuf::from);
        config.tls.client_key_path = lookup("MG_CLIENT_KEY").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Check that every service URL parses and can carry path segments.
    ///
    /// # Errors
    ///
    /// Returns the first offending service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (service, raw) in self.services() {
            parse_base_url(service, raw)?;
        }
        Ok(())
    }

    /// `(service name, base URL)` pairs.
    #[must_use]
    pub fn services(&self) -> [(&'static str, &str); 9] {
        [
            ("users", self.users_url.as_str()),
            ("things", self.things_url.as_str()),
            ("channels", self.channels_url.as_str()),
            ("groups", self.groups_url.as_str()),
            ("domains", self.domains_url.as_str()),
            ("readers", self.readers_url.as_str()),
            ("http_adapter", self.http_adapter_url.as_str()),
            ("certs", self.certs_url.as_str()),
            ("bootstrap", self.bootstrap_url.as_str()),
        ]
    }
}

/// Parse a service base URL.
///
/// # Errors
///
/// Returns error if the URL is invalid or cannot be a base (e.g. `mailto:`).
pub fn parse_base_url(service: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        service: service.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase {
            service: service.to_string(),
            url: raw.to_string(),
        });
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A service URL failed to parse
    #[error("invalid {service} URL: {source}")]
    InvalidUrl {
        /// Service the URL belongs to
        service: String,
        /// Parser error
        source: url::ParseError,
    },
    /// A service URL cannot carry path segments
    #[error("{service} URL cannot be a base: {url}")]
    NotABase {
        /// Service the URL belongs to
        service: String,
        /// Offending URL
        url: String,
    },
    /// The HTTP client or its TLS material could not be set up
    #[error("client init error: {0}")]
    Init(String),
}
