//! The `{code, msg, data}` response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only `code` value that marks an envelope as successful
pub const SUCCESS_CODE: &str = "0";

/// Wire shape used by most booking endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Application status code, `"0"` on success
    pub code: String,
    /// Human-readable status message
    pub msg: String,
    /// Payload
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    /// A successful envelope around `data`
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            msg: "ok".to_string(),
            data,
        }
    }

    /// Whether `code` is the success sentinel
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl ApiEnvelope<Value> {
    /// A failed envelope with a null payload
    pub fn failure(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            msg: msg.into(),
            data: Value::Null,
        }
    }
}

/// Structural envelope check
///
/// Only the presence of the `code`, `msg` and `data` keys matters; their
/// values are not inspected.
#[must_use]
pub fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|fields| {
        fields.contains_key("code") && fields.contains_key("msg") && fields.contains_key("data")
    })
}

/// Leading-integer parse of an envelope code
///
/// Skips leading whitespace, accepts an optional sign and reads digits up to
/// the first non-digit, so `"404abc"` is 404 and `"abc"` is `None`.
#[must_use]
pub fn parse_code(code: &Value) -> Option<i64> {
    match code {
        Value::String(text) => parse_leading_int(text),
        #[allow(clippy::cast_possible_truncation)]
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
