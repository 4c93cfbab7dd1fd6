//! Slack Web API client
//!
//! Only `chat.postMessage` is needed. Calls are made once; redelivery is the
//! queue's job, not ours.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use std::time::Duration;

use crate::core::models::OutboundMessage;
use crate::errors::RelayError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts replies to a chat channel.
#[async_trait]
pub trait ChatPoster: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the HTTP call fails or the API reports `ok: false`.
    async fn post_message(
        &self,
        access_token: &str,
        message: &OutboundMessage,
    ) -> Result<(), RelayError>;
}

pub struct SlackClient {
    http: Client,
    base_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Builds a client with its own HTTP connection pool and a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_default_http(base_url: impl Into<String>) -> Result<Self, RelayError> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self::new(http, base_url))
    }

    #[must_use]
    pub fn post_message_url(&self) -> String {
        format!("{}/chat.postMessage", self.base_url)
    }
}

/// Reads the `ok` / `error` envelope every Slack Web API response carries.
pub fn check_api_response(method: &str, body: &Value) -> Result<(), RelayError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    Err(RelayError::SlackError(format!(
        "{method} error: {}",
        body.get("error").and_then(Value::as_str).unwrap_or("unknown")
    )))
}

#[async_trait]
impl ChatPoster for SlackClient {
    async fn post_message(
        &self,
        access_token: &str,
        message: &OutboundMessage,
    ) -> Result<(), RelayError> {
        let resp = self
            .http
            .post(self.post_message_url())
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=UTF-8"),
            )
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .json(message)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RelayError::SlackError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await?;
        check_api_response("chat.postMessage", &body)
    }
}
