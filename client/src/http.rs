//! The HTTP collaborator seam and its `reqwest` implementation.

use crate::config::ClientConfig;
use crate::error::HttpError;
use futures::future::BoxFuture;
use serde_json::Value;

/// Future returned by [`HttpCollaborator`] calls
pub type HttpFuture = BoxFuture<'static, Result<Value, HttpError>>;

/// REST client used by the booking API
///
/// Implementations resolve to the decoded JSON body. Base URL, timeout and
/// authentication are their own configuration.
pub trait HttpCollaborator: Send + Sync {
    /// `GET path`
    fn get(&self, path: &str) -> HttpFuture;

    /// `POST path` with a JSON body
    fn post(&self, path: &str, body: Value) -> HttpFuture;
}

/// [`HttpCollaborator`] backed by `reqwest`
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ReqwestHttpClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Setup`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HttpError::Setup {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Base URL every path is joined onto
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn execute(&self, request: reqwest::RequestBuilder) -> HttpFuture {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        Box::pin(async move {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let text = response.text().await.map_err(|e| HttpError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            })?;

            tracing::debug!(status = status.as_u16(), bytes = text.len(), "HTTP response");

            if status.is_success() {
                if text.trim().is_empty() {
                    return Ok(Value::Null);
                }
                serde_json::from_str(&text).map_err(|e| HttpError::Decode {
                    status: status.as_u16(),
                    message: e.to_string(),
                })
            } else {
                let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
                Err(HttpError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        })
    }
}

impl HttpCollaborator for ReqwestHttpClient {
    fn get(&self, path: &str) -> HttpFuture {
        tracing::debug!(path, "GET");
        self.execute(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str, body: Value) -> HttpFuture {
        tracing::debug!(path, "POST");
        self.execute(self.client.post(self.url(path)).json(&body))
    }
}

fn transport_error(error: reqwest::Error) -> HttpError {
    if error.is_builder() {
        HttpError::Setup {
            message: error.to_string(),
        }
    } else {
        HttpError::NoResponse {
            reason: error.to_string(),
        }
    }
}
