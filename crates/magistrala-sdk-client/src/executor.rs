//! Request execution.
//!
//! The [`Executor`] performs exactly one HTTP round-trip per call and turns
//! the outcome into either a decoded JSON value or a [`DomainError`]:
//!
//! - no response reachable: [`ErrorKind::Network`], no status
//! - non-2xx: the body's `message` field (if any) and the status go through
//!   [`handle_error`]
//! - 2xx with a body that is not JSON: [`ErrorKind::Malformed`]
//!
//! There are no retries, no timeouts and no caching.
//!
//! [`ErrorKind::Network`]: magistrala_sdk_core::ErrorKind::Network
//! [`ErrorKind::Malformed`]: magistrala_sdk_core::ErrorKind::Malformed

use crate::config::{ConfigError, TlsConfig};
use crate::credential::Credential;
use magistrala_sdk_core::defs::Response;
use magistrala_sdk_core::{handle_error, DomainError, QueryParameters};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use url::Url;

/// Content type sent with every request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Error body returned by the platform on failure.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// One request as assembled by an entity client.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    url: Url,
    credential: Credential,
    body: Option<Vec<u8>>,
    extra_headers: HeaderMap,
}

impl RequestSpec {
    /// Create a request with no credential and no body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            credential: Credential::None,
            body: None,
            extra_headers: HeaderMap::new(),
        }
    }

    /// `GET url`
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// `POST url`
    #[must_use]
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// `PUT url`
    #[must_use]
    pub fn put(url: Url) -> Self {
        Self::new(Method::PUT, url)
    }

    /// `PATCH url`
    #[must_use]
    pub fn patch(url: Url) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// `DELETE url`
    #[must_use]
    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Set the authorization scheme.
    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the body fails to serialize.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, DomainError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| DomainError::invalid_request(format!("failed to encode body: {e}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Forward pre-serialized bytes unmodified.
    #[must_use]
    pub fn raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header beyond `Content-Type` and `Authorization`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the value is not a valid header value.
    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self, DomainError> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| DomainError::invalid_request(format!("invalid {name} header: {e}")))?;
        self.extra_headers.insert(name, value);
        Ok(self)
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Fully-qualified URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Final header map: `Content-Type`, `Authorization` and extras.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the credential is not a valid header value.
    pub fn headers(&self) -> Result<HeaderMap, DomainError> {
        let mut headers = self.extra_headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        if let Some(auth) = self.credential.header_value()? {
            headers.insert(AUTHORIZATION, auth);
        }
        Ok(headers)
    }
}

/// Build a service URL from a base, path segments and optional query.
///
/// Segments are percent-encoded individually, so an id containing `/` stays
/// a single segment. An empty query is omitted.
///
/// # Errors
///
/// Returns `InvalidRequest` if `base` cannot carry path segments.
///
/// # Examples
///
/// ```
/// use magistrala_sdk_client::executor::endpoint;
/// use magistrala_sdk_core::QueryParameters;
/// use url::Url;
///
/// let base = Url::parse("http://localhost:9000").unwrap();
/// let query = QueryParameters::new().with("limit", 10u64);
/// let url = endpoint(&base, ["d1", "things"], Some(&query)).unwrap();
/// assert_eq!(url.as_str(), "http://localhost:9000/d1/things?limit=10");
/// ```
pub fn endpoint<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
    query: Option<&QueryParameters>,
) -> Result<Url, DomainError> {
    let mut url = base.clone();
    url.set_query(None);
    {
        let mut path = url.path_segments_mut().map_err(|()| {
            DomainError::invalid_request(format!("base URL cannot take path segments: {base}"))
        })?;
        path.pop_if_empty().extend(segments);
    }

    if let Some(query) = query {
        let encoded = query.encode();
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
    }

    Ok(url)
}

/// Single-shot HTTP executor shared by all entity clients.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Executor {
    client: Client,
}

impl Executor {
    /// Create an executor with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_tls(&TlsConfig::default())
    }

    /// Create an executor with custom TLS material.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created, or if TLS
    /// certificate files cannot be read or parsed.
    pub fn with_tls(tls: &TlsConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().use_rustls_tls();

        // Custom CA for self-signed deployments
        if let Some(ca_path) = &tls.ca_cert_path {
            let ca_cert = fs::read(ca_path).map_err(|e| {
                ConfigError::Init(format!(
                    "failed to read CA certificate {}: {e}",
                    ca_path.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&ca_cert)
                .map_err(|e| ConfigError::Init(format!("failed to parse CA certificate: {e}")))?;
            builder = builder.add_root_certificate(cert);
            tracing::debug!(ca_path = %ca_path.display(), "Loaded custom CA certificate");
        }

        // mTLS needs both halves
        if let (Some(cert_path), Some(key_path)) = (&tls.client_cert_path, &tls.client_key_path) {
            let mut identity_pem = fs::read(cert_path).map_err(|e| {
                ConfigError::Init(format!(
                    "failed to read client certificate {}: {e}",
                    cert_path.display()
                ))
            })?;
            let key_pem = fs::read(key_path).map_err(|e| {
                ConfigError::Init(format!(
                    "failed to read client key {}: {e}",
                    key_path.display()
                ))
            })?;
            identity_pem.extend_from_slice(&key_pem);

            let identity = reqwest::Identity::from_pem(&identity_pem)
                .map_err(|e| ConfigError::Init(format!("failed to create client identity: {e}")))?;
            builder = builder.identity(identity);
            tracing::debug!(
                cert_path = %cert_path.display(),
                key_path = %key_path.display(),
                "Loaded client certificate for mTLS"
            );
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::Init(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Perform one call and decode the success body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Network` when no response was received, `Malformed` when a
    /// success body is not JSON, and the normalized kind for non-2xx statuses.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<Value, DomainError> {
        let (status, bytes) = self.dispatch(method, url, headers, body).await?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::malformed(status, e))
    }

    /// Perform a request assembled by an entity client.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn run(&self, spec: RequestSpec) -> Result<Value, DomainError> {
        let headers = spec.headers()?;
        self.execute(spec.method, spec.url, headers, spec.body).await
    }

    /// Perform a request and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`]. A body that is JSON but does not match `T`
    /// is reported as `Malformed`.
    pub async fn run_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, DomainError> {
        let headers = spec.headers()?;
        let (status, bytes) = self
            .dispatch(spec.method, spec.url, headers, spec.body)
            .await?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::malformed(status, e))
    }

    /// Perform a request whose success carries no entity.
    ///
    /// The body is not decoded; the acknowledgement holds the response
    /// status and `success_message`.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`], except that `Malformed` is never returned.
    pub async fn run_ack(
        &self,
        spec: RequestSpec,
        success_message: &str,
    ) -> Result<Response, DomainError> {
        let headers = spec.headers()?;
        let (status, _) = self
            .dispatch(spec.method, spec.url, headers, spec.body)
            .await?;
        Ok(Response {
            status,
            message: Some(success_message.to_string()),
        })
    }

    /// Send the request and return the success status and raw body.
    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        tracing::debug!(%method, %url, "Sending request");

        let mut request = self.client.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "Request did not reach the server");
            if e.is_builder() {
                DomainError::invalid_request(e)
            } else {
                DomainError::network(e)
            }
        })?;

        let status = response.status();
        let body = response.bytes().await;

        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
                .and_then(|b| b.message);
            let err = handle_error(message.as_deref(), status.as_u16());
            tracing::warn!(
                %method,
                %url,
                status = status.as_u16(),
                kind = %err.kind,
                "Request failed"
            );
            return Err(err);
        }

        let bytes = body.map_err(|e| DomainError::malformed(status.as_u16(), e))?;
        tracing::debug!(%method, %url, status = status.as_u16(), "Request succeeded");
        Ok((status.as_u16(), bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magistrala_sdk_core::ErrorKind;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{p}", server.uri())).unwrap()
    }

    #[test]
    fn endpoint_encodes_segments() {
        let base = Url::parse("http://localhost:9000/api/").unwrap();
        let url = endpoint(&base, ["d1", "things", "a/b"], None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/d1/things/a%2Fb");
    }

    #[test]
    fn endpoint_skips_empty_query() {
        let base = Url::parse("http://localhost:9000").unwrap();
        let url = endpoint(&base, ["users"], Some(&QueryParameters::new())).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/users");
    }

    #[test]
    fn endpoint_rejects_non_base_url() {
        let base = Url::parse("mailto:ops@example.com").unwrap();
        let err = endpoint(&base, ["users"], None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
    }

    #[test]
    fn headers_carry_content_type_and_credential() {
        let spec = RequestSpec::get(Url::parse("http://localhost").unwrap())
            .credential(Credential::thing("secret"));
        let headers = spec.headers().unwrap();
        assert_eq!(headers[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(headers[AUTHORIZATION], "Thing secret");
    }

    #[test]
    fn no_credential_sends_no_authorization() {
        let spec = RequestSpec::post(Url::parse("http://localhost").unwrap());
        assert!(spec.headers().unwrap().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn success_body_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .and(header("authorization", "Bearer token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let spec = RequestSpec::get(url(&server, "/users/u1")).credential(Credential::bearer("token"));
        let value = assert_ok!(executor.run(spec).await);
        assert_eq!(value["id"], "u1");
    }

    #[tokio::test]
    async fn unauthenticated_keeps_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "bad token"})),
            )
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let err = assert_err!(
            executor
                .execute(Method::GET, url(&server, "/users"), HeaderMap::new(), None)
                .await
        );
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.status, Some(401));
        assert_eq!(err.message, "bad token");
    }

    #[tokio::test]
    async fn unparsable_error_body_uses_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let err = assert_err!(executor.run(RequestSpec::get(url(&server, "/x"))).await);
        assert_eq!(err.kind, ErrorKind::ServerFault);
        assert_eq!(err.message, ErrorKind::ServerFault.default_message());
    }

    #[tokio::test]
    async fn unlisted_status_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let err = assert_err!(executor.run(RequestSpec::get(url(&server, "/x"))).await);
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.status, Some(503));
    }

    #[tokio::test]
    async fn non_json_success_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let err = assert_err!(executor.run(RequestSpec::get(url(&server, "/x"))).await);
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.status, Some(200));
    }

    #[tokio::test]
    async fn shape_mismatch_is_malformed() {
        #[derive(Debug, Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            id: String,
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let result = executor
            .run_json::<Expected>(RequestSpec::get(url(&server, "/x")))
            .await;
        assert_eq!(result.unwrap_err().kind, ErrorKind::Malformed);
    }

    #[tokio::test]
    async fn unreachable_host_is_network() {
        let executor = Executor::new().unwrap();
        let spec = RequestSpec::get(Url::parse("http://127.0.0.1:1/users").unwrap());
        let err = assert_err!(executor.run(spec).await);
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.status.is_none());
    }

    #[tokio::test]
    async fn ack_ignores_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/u1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let ack = assert_ok!(
            executor
                .run_ack(RequestSpec::delete(url(&server, "/users/u1")), "User deleted successfully")
                .await
        );
        assert_eq!(ack.status, 204);
        assert_eq!(ack.message.as_deref(), Some("User deleted successfully"));
    }

    #[tokio::test]
    async fn raw_body_is_forwarded_unmodified() {
        let payload = br#"[{"bn":"demo","n":"voltage","u":"V","v":5}]"#;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_bytes(payload.to_vec()))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let executor = Executor::new().unwrap();
        let spec = RequestSpec::post(url(&server, "/m")).raw_body(payload.to_vec());
        let ack = assert_ok!(executor.run_ack(spec, "sent").await);
        assert_eq!(ack.status, 202);
    }

    #[test]
    fn client_creation_with_missing_ca_fails() {
        let tls = TlsConfig {
            ca_cert_path: Some("/nonexistent/ca.pem".into()),
            ..Default::default()
        };
        let err = Executor::with_tls(&tls).unwrap_err();
        assert!(err.to_string().contains("client init error"));
    }
}
