//! Normalized error taxonomy.
//!
//! Every failure surfaced by the SDK is a [`DomainError`]. Its [`ErrorKind`]
//! is derived from the HTTP status through a closed lookup table, so callers
//! can branch on the kind without parsing message text.

use std::fmt;

/// Status code to kind mapping. Extend only by adding rows.
const STATUS_KINDS: &[(u16, ErrorKind)] = &[
    (400, ErrorKind::InvalidPayload),
    (401, ErrorKind::Unauthenticated),
    (403, ErrorKind::Forbidden),
    (404, ErrorKind::NotFound),
    (409, ErrorKind::Conflict),
    (415, ErrorKind::UnsupportedMediaType),
    (422, ErrorKind::UnprocessableEntity),
    (500, ErrorKind::ServerFault),
];

/// Normalized category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400: malformed body or query parameters
    InvalidPayload,
    /// 401: missing or invalid credentials
    Unauthenticated,
    /// 403: authenticated but not authorized
    Forbidden,
    /// 404
    NotFound,
    /// 409: entity already exists
    Conflict,
    /// 415
    UnsupportedMediaType,
    /// 422
    UnprocessableEntity,
    /// 500
    ServerFault,
    /// No response could be obtained from the server.
    Network,
    /// A success response carried a body that could not be decoded.
    Malformed,
    /// The request could not be assembled on the client side.
    InvalidRequest,
    /// Any status not present in the table.
    Unknown,
}

impl ErrorKind {
    /// Classify an HTTP status code.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        STATUS_KINDS
            .iter()
            .find(|(code, _)| *code == status)
            .map_or(Self::Unknown, |(_, kind)| *kind)
    }

    /// Message used when the server did not supply one.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidPayload => "Failed due to malformed JSON or query parameters.",
            Self::Unauthenticated => "Missing or invalid access token provided.",
            Self::Forbidden => "Failed to perform authorization over the entity.",
            Self::NotFound => "Entity does not exist.",
            Self::Conflict => "Entity already exists.",
            Self::UnsupportedMediaType => "Missing or invalid content type.",
            Self::UnprocessableEntity => "Unprocessable entity.",
            Self::ServerFault => "Unexpected server-side error occurred.",
            Self::Network => "Failed to reach the server.",
            Self::Malformed => "Failed to decode the response body.",
            Self::InvalidRequest => "Failed to build the request.",
            Self::Unknown => "Unexpected error occurred.",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPayload => "invalid payload",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::UnsupportedMediaType => "unsupported media type",
            Self::UnprocessableEntity => "unprocessable entity",
            Self::ServerFault => "server fault",
            Self::Network => "network",
            Self::Malformed => "malformed response",
            Self::InvalidRequest => "invalid request",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed SDK call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error{}: {message}", status_suffix(.status.as_ref()))]
pub struct DomainError {
    /// Normalized category
    pub kind: ErrorKind,
    /// HTTP status, absent when no response was received
    pub status: Option<u16>,
    /// Server message, or the kind's default
    pub message: String,
}

impl DomainError {
    /// Build an error for a kind that has no associated response.
    #[must_use]
    pub fn without_status(kind: ErrorKind, detail: Option<&str>) -> Self {
        Self {
            kind,
            status: None,
            message: detail.map_or_else(|| kind.default_message().to_string(), str::to_string),
        }
    }

    /// Transport failure before any response arrived.
    #[must_use]
    pub fn network(detail: impl fmt::Display) -> Self {
        Self::without_status(ErrorKind::Network, Some(&detail.to_string()))
    }

    /// Client-side request construction failure.
    #[must_use]
    pub fn invalid_request(detail: impl fmt::Display) -> Self {
        Self::without_status(ErrorKind::InvalidRequest, Some(&detail.to_string()))
    }

    /// A success response whose body could not be decoded.
    #[must_use]
    pub fn malformed(status: u16, detail: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Malformed,
            status: Some(status),
            message: detail.to_string(),
        }
    }
}

fn status_suffix(status: Option<&u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Normalize an HTTP failure into a [`DomainError`].
///
/// An absent or empty `message` is replaced by the kind's default text.
///
/// # Examples
///
/// ```
/// use magistrala_sdk_core::{handle_error, ErrorKind};
///
/// let err = handle_error(Some("bad token"), 401);
/// assert_eq!(err.kind, ErrorKind::Unauthenticated);
/// assert_eq!(err.message, "bad token");
///
/// let err = handle_error(None, 418);
/// assert_eq!(err.kind, ErrorKind::Unknown);
/// ```
#[must_use]
pub fn handle_error(message: Option<&str>, status: u16) -> DomainError {
    let kind = ErrorKind::from_status(status);
    let message = match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => kind.default_message().to_string(),
    };

    DomainError {
        kind,
        status: Some(status),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabulated_statuses() {
        let expected = [
            (400, ErrorKind::InvalidPayload),
            (401, ErrorKind::Unauthenticated),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (409, ErrorKind::Conflict),
            (415, ErrorKind::UnsupportedMediaType),
            (422, ErrorKind::UnprocessableEntity),
            (500, ErrorKind::ServerFault),
        ];

        for (status, kind) in expected {
            let err = handle_error(None, status);
            assert_eq!(err.kind, kind, "status {status}");
            assert_eq!(err.status, Some(status));
        }
    }

    #[test]
    fn unlisted_status_is_unknown() {
        for status in [0, 200, 302, 402, 418, 429, 501, 502, 503, 999] {
            assert_eq!(handle_error(None, status).kind, ErrorKind::Unknown);
        }
    }

    #[test]
    fn server_message_passes_through() {
        let err = handle_error(Some("entity not found"), 404);
        assert_eq!(err.message, "entity not found");
    }

    #[test]
    fn absent_message_uses_default() {
        let err = handle_error(None, 401);
        assert_eq!(err.message, "Missing or invalid access token provided.");

        let err = handle_error(Some(""), 409);
        assert_eq!(err.message, ErrorKind::Conflict.default_message());
    }

    #[test]
    fn network_error_has_no_status() {
        let err = DomainError::network("connection refused");
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.status.is_none());
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn display_includes_status_when_present() {
        let err = handle_error(Some("bad token"), 401);
        assert_eq!(err.to_string(), "unauthenticated error (status 401): bad token");

        let err = DomainError::without_status(ErrorKind::Network, None);
        assert_eq!(err.to_string(), "network error: Failed to reach the server.");
    }
}
