//! Error taxonomy for The One API client.

use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Errors returned by every client operation.
///
/// HTTP responses are classified once, when they are received, so the kind is
/// the same whichever binding issued the request.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum OneApiError {
    /// The API rejected the bearer token (HTTP 401).
    #[error("You must provide a valid API token (see: https://the-one-api.dev/sign-up)")]
    Auth,

    /// The API throttled the caller (HTTP 429).
    #[error("Too many requests, please try again later")]
    RateLimited,

    /// Any other non-success HTTP response.
    #[error("The One API error (HTTP {status}): {message}")]
    Remote {
        /// Response status code.
        status: StatusCode,
        /// Message reported by the server, or the raw body.
        message: String,
    },

    /// Failure below the HTTP layer (connect, DNS, timeout, body read).
    ///
    /// The `reqwest::Error` is kept as-is so callers can inspect it.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A success response whose body is not the expected envelope.
    #[error("failed to decode JSON response: {path}")]
    Decode {
        /// Request path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A single-item lookup returned no document.
    #[error("no document found: {path}")]
    NotFound {
        /// Request path.
        path: String,
    },

    /// The request path could not be joined onto the base URL.
    #[error("failed to join URL path: {path}")]
    InvalidUrl {
        /// Request path.
        path: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The API token cannot be carried in an HTTP header.
    #[error("API token is not a valid header value")]
    InvalidToken(#[source] InvalidHeaderValue),
}

impl OneApiError {
    /// Returns `true` for authentication failures.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }

    /// Returns `true` for rate-limit failures.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// HTTP status of the response that caused this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth => Some(StatusCode::UNAUTHORIZED),
            Self::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classifies a non-success response.
    ///
    /// `body` is the raw response text; a JSON `message` field is preferred
    /// over the raw text, and the status reason is used when both are empty.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Auth,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            _ => Self::Remote {
                status,
                message: remote_message(status, body),
            },
        }
    }
}

/// Error body returned by the API, e.g. `{"success":false,"message":"..."}`.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

fn remote_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && !parsed.message.is_empty()
    {
        return parsed.message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return String::from(trimmed);
    }
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), String::from)
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OneApiError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;

    #[test]
    fn test_401_is_auth() {
        // Arrange & Act
        let err = OneApiError::from_status(StatusCode::UNAUTHORIZED, "");

        // Assert
        assert!(err.is_auth());
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.to_string().contains("valid API token"));
    }

    #[test]
    fn test_429_is_rate_limited() {
        // Arrange & Act
        let err = OneApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down");

        // Assert
        assert!(err.is_rate_limited());
        assert!(!err.is_auth());
    }

    #[test]
    fn test_remote_prefers_json_message() {
        // Arrange
        let body = r#"{"success":false,"message":"Something went wrong."}"#;

        // Act
        let err = OneApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, body);

        // Assert
        match err {
            OneApiError::Remote { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Something went wrong.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_remote_falls_back_to_raw_body() {
        // Arrange & Act
        let err = OneApiError::from_status(StatusCode::BAD_GATEWAY, "  upstream down \n");

        // Assert
        assert_eq!(
            err.to_string(),
            "The One API error (HTTP 502 Bad Gateway): upstream down"
        );
    }

    #[test]
    fn test_remote_empty_body_uses_reason() {
        // Arrange
        let status = StatusCode::from_u16(555).unwrap();

        // Act
        let err = OneApiError::from_status(status, "");

        // Assert
        assert_eq!(err.status(), Some(status));
        assert!(err.to_string().contains("HTTP 555"));
    }
}
