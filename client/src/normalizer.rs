//! Normalization of remote call results.
//!
//! [`normalize_value`] and [`classify`] are pure; [`ServiceCallNormalizer`]
//! runs a call and applies them at a single boundary.

use crate::envelope::{SUCCESS_CODE, is_envelope, parse_code};
use crate::error::{DEFAULT_API_ERROR, DEFAULT_CLIENT_ERROR, HttpError, OriginalError, ServiceError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// Uniform outcome of a remote call: `Ok(data)` or a classified [`ServiceError`]
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Status code reported for a failed envelope whose code is not numeric
const FALLBACK_ENVELOPE_STATUS: i64 = 400;

/// Runs remote calls and normalizes their outcome
///
/// Stateless: two invocations never share anything, so equal inputs give
/// equal results. There is no retry, timeout or de-duplication here; the
/// collaborator's configuration owns the timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceCallNormalizer;

impl ServiceCallNormalizer {
    /// Create a normalizer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run `call` and normalize its result into `T`
    ///
    /// Envelopes are unwrapped, plain bodies pass through, transport errors
    /// are classified, and the payload is decoded into `T`. A payload that
    /// does not decode becomes [`ServiceError::MalformedResponse`].
    pub async fn invoke<T, F, Fut>(&self, call: F) -> ServiceResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, HttpError>>,
    {
        let result = match call().await {
            Ok(value) => normalize_value(value).and_then(decode_payload),
            Err(error) => Err(classify(error)),
        };

        if let Err(error) = &result {
            tracing::warn!(
                status_code = ?error.status_code(),
                error = %error,
                "Service call failed"
            );
        }

        result
    }

    /// Run `call` and normalize its result without decoding the payload
    pub async fn invoke_value<F, Fut>(&self, call: F) -> ServiceResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, HttpError>>,
    {
        self.invoke(call).await
    }
}

/// Unwrap an envelope, or pass a plain value through as the payload
///
/// # Errors
///
/// Returns [`ServiceError::Server`] for an envelope whose `code` is not the
/// string `"0"`.
pub fn normalize_value(value: Value) -> ServiceResult<Value> {
    if !is_envelope(&value) {
        return Ok(value);
    }

    let succeeded = matches!(value.get("code"), Some(Value::String(code)) if code == SUCCESS_CODE);
    if succeeded {
        return Ok(match value {
            Value::Object(mut fields) => fields.remove("data").unwrap_or(Value::Null),
            other => other,
        });
    }

    let message = value
        .get("msg")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .unwrap_or(DEFAULT_API_ERROR)
        .to_string();
    let status_code = value
        .get("code")
        .and_then(parse_code)
        .unwrap_or(FALLBACK_ENVELOPE_STATUS);

    Err(ServiceError::Server {
        message,
        status_code,
        original: OriginalError::Envelope(value),
    })
}

/// Classify a transport error
#[must_use]
pub fn classify(error: HttpError) -> ServiceError {
    match error {
        HttpError::Status { status, ref body } => {
            let message = message_from_body(body)
                .unwrap_or_else(|| format!("Request failed with status code {status}"));
            ServiceError::Server {
                message,
                status_code: i64::from(status),
                original: OriginalError::Http(error),
            }
        },
        HttpError::NoResponse { .. } => ServiceError::Network { original: error },
        HttpError::Setup { ref message } => {
            let message = if message.trim().is_empty() {
                DEFAULT_CLIENT_ERROR.to_string()
            } else {
                message.clone()
            };
            ServiceError::Client {
                message,
                original: error,
            }
        },
        HttpError::Decode { status, .. } => ServiceError::MalformedResponse {
            message: error.to_string(),
            status_code: Some(i64::from(status)),
            original: OriginalError::Http(error),
        },
    }
}

/// `message`, then `error`, then the body itself
fn message_from_body(body: &Value) -> Option<String> {
    for key in ["message", "error"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    match body {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_payload<T: DeserializeOwned>(value: Value) -> ServiceResult<T> {
    T::deserialize(&value).map_err(|error| ServiceError::MalformedResponse {
        message: format!("Unexpected response payload: {error}"),
        status_code: None,
        original: OriginalError::Payload(value.clone()),
    })
}
