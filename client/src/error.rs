//! Error types for remote booking calls

use serde_json::Value;
use thiserror::Error;

/// Message used for every request that never got a response
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your API or internet.";

/// Message used for a failed envelope with an empty `msg`
pub const DEFAULT_API_ERROR: &str = "API Error";

/// Message used for a local error without a message of its own
pub const DEFAULT_CLIENT_ERROR: &str = "An unexpected error occurred";

/// Transport-level failure reported by an [`HttpCollaborator`](crate::HttpCollaborator)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// The server answered with a non-success status
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (JSON, or the raw text as a JSON string)
        body: Value,
    },

    /// The request was sent but no response arrived (connect failure, timeout)
    #[error("No response received: {reason}")]
    NoResponse {
        /// Underlying transport message
        reason: String,
    },

    /// The request could not be built or sent (bad URL, bad configuration)
    #[error("{message}")]
    Setup {
        /// Local error message
        message: String,
    },

    /// A success status whose body was not JSON
    #[error("Response body could not be decoded (status {status}): {message}")]
    Decode {
        /// HTTP status code
        status: u16,
        /// Decoder message
        message: String,
    },
}

/// The raw value a [`ServiceError`] was derived from
#[derive(Debug, Clone, PartialEq)]
pub enum OriginalError {
    /// A non-success `{code, msg, data}` envelope
    Envelope(Value),
    /// A transport error
    Http(HttpError),
    /// A payload that did not match the expected type
    Payload(Value),
}

/// Normalized failure of a remote call
///
/// `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The call completed but the server reported failure (envelope code or HTTP status)
    #[error("{message}")]
    Server {
        /// User-facing message
        message: String,
        /// Envelope code or HTTP status
        status_code: i64,
        /// Envelope or transport error
        original: OriginalError,
    },

    /// The request was sent but nothing came back
    #[error("{}", NO_RESPONSE_MESSAGE)]
    Network {
        /// Transport error
        original: HttpError,
    },

    /// The call failed before a request was made
    #[error("{message}")]
    Client {
        /// Local error message
        message: String,
        /// Transport error
        original: HttpError,
    },

    /// The response could not be used as the requested payload
    #[error("{message}")]
    MalformedResponse {
        /// Decoder message
        message: String,
        /// HTTP status, when the transport reported one
        status_code: Option<i64>,
        /// Undecodable payload or transport error
        original: OriginalError,
    },
}

impl ServiceError {
    /// User-facing message
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Server { message, .. }
            | Self::Client { message, .. }
            | Self::MalformedResponse { message, .. } => message,
            Self::Network { .. } => NO_RESPONSE_MESSAGE,
        }
    }

    /// Numeric status, when one is known
    #[must_use]
    pub const fn status_code(&self) -> Option<i64> {
        match self {
            Self::Server { status_code, .. } => Some(*status_code),
            Self::MalformedResponse { status_code, .. } => *status_code,
            Self::Network { .. } | Self::Client { .. } => None,
        }
    }

    /// The raw value this error was derived from
    #[must_use]
    pub fn original_error(&self) -> OriginalError {
        match self {
            Self::Server { original, .. } | Self::MalformedResponse { original, .. } => {
                original.clone()
            },
            Self::Network { original } | Self::Client { original, .. } => {
                OriginalError::Http(original.clone())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn network_error_uses_fixed_message() {
        let error = ServiceError::Network {
            original: HttpError::NoResponse {
                reason: "connection refused".to_string(),
            },
        };
        assert_eq!(error.to_string(), NO_RESPONSE_MESSAGE);
        assert_eq!(error.message(), NO_RESPONSE_MESSAGE);
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn server_error_exposes_status_and_original() {
        let envelope = json!({"code": "1003", "msg": "slot taken", "data": null});
        let error = ServiceError::Server {
            message: "slot taken".to_string(),
            status_code: 1003,
            original: OriginalError::Envelope(envelope.clone()),
        };
        assert_eq!(error.to_string(), "slot taken");
        assert_eq!(error.status_code(), Some(1003));
        assert_eq!(error.original_error(), OriginalError::Envelope(envelope));
    }

    #[test]
    fn client_error_wraps_transport_error() {
        let original = HttpError::Setup {
            message: "relative URL without a base".to_string(),
        };
        let error = ServiceError::Client {
            message: original.to_string(),
            original: original.clone(),
        };
        assert_eq!(error.original_error(), OriginalError::Http(original));
    }
}
