//! Authorization schemes.
//!
//! End users and domain-scoped actions authenticate with a bearer token.
//! Devices authenticate with their thing secret, used only for telemetry
//! ingestion, self-identification and bootstrap retrieval.

use magistrala_sdk_core::DomainError;
use reqwest::header::HeaderValue;
use std::fmt;

/// Credential presented in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Thing <secret>`
    Thing(String),
    /// No `Authorization` header
    None,
}

impl Credential {
    /// User or domain scoped access token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Device secret.
    #[must_use]
    pub fn thing(secret: impl Into<String>) -> Self {
        Self::Thing(secret.into())
    }

    /// Header text, or `None` when no header is sent.
    #[must_use]
    pub fn header_text(&self) -> Option<String> {
        match self {
            Self::Bearer(token) => Some(format!("Bearer {token}")),
            Self::Thing(secret) => Some(format!("Thing {secret}")),
            Self::None => None,
        }
    }

    /// Header value marked sensitive so it never shows up in debug output.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the token contains characters not allowed
    /// in a header.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, DomainError> {
        let Some(text) = self.header_text() else {
            return Ok(None);
        };

        let mut value = HeaderValue::from_str(&text)
            .map_err(|e| DomainError::invalid_request(format!("invalid authorization header: {e}")))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::Thing(_) => f.write_str("Thing(***)"),
            Self::None => f.write_str("None"),
        }
    }
}
