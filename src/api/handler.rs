//! API Lambda handler: validates Slack Events API callbacks and queues app mentions.
//!
//! Checks run in a fixed order and the first one that decides the request wins:
//! retry suppression, optional signature check, body parsing, URL verification,
//! text presence, event type, verify token, and finally the queue hand-off.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{helpers, parsing, signature, sqs::MessageQueue};
use crate::core::config::IngressConfig;
use crate::core::secrets::SecretStore;

pub const RETRY_NUM_HEADER: &str = "X-Slack-Retry-Num";
pub const RETRY_REASON_HEADER: &str = "X-Slack-Retry-Reason";

pub const MSG_BODY_NOT_FOUND: &str = "Body is not found.";
pub const MSG_CHALLENGE_NOT_FOUND: &str = "Challenge is not found.";
pub const MSG_TEXT_NOT_FOUND: &str = "Text is not found.";
pub const MSG_NOT_APP_MENTION: &str = "Not an app mention.";
pub const MSG_INVALID_TOKEN: &str = "Invalid token.";
pub const MSG_INVALID_SIGNATURE: &str = "Invalid signature.";
pub const MSG_TOKEN_UNAVAILABLE: &str = "Failed to fetch verify token.";
pub const MSG_SIGNING_SECRET_UNAVAILABLE: &str = "Failed to fetch signing secret.";
pub const MSG_QUEUE_FAILED: &str = "Failed to send message to SQS.";
pub const MSG_PROCESSED: &str = "Request processed successfully";

pub struct IngressHandler<S, Q> {
    config: IngressConfig,
    secrets: S,
    queue: Q,
}

impl<S, Q> IngressHandler<S, Q>
where
    S: SecretStore,
    Q: MessageQueue,
{
    pub fn new(config: IngressConfig, secrets: S, queue: Q) -> Self {
        Self {
            config,
            secrets,
            queue,
        }
    }

    /// Handles one API Gateway proxy event and returns the proxy response.
    ///
    /// Request-level problems are reported through the status code; this never fails.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn handle(&self, payload: &Value) -> Value {
        let headers = payload.get("headers").unwrap_or(&Value::Null);

        if let Some(retry_num) = parsing::get_header_value(headers, RETRY_NUM_HEADER) {
            let reason = parsing::get_header_value(headers, RETRY_REASON_HEADER).unwrap_or("");
            info!(retry_num = %retry_num, retry_reason = %reason, "Ignoring Slack retry delivery");
            return helpers::ok_empty();
        }

        #[cfg(feature = "debug-logs")]
        info!("Received event: {}", payload);

        let raw = match parsing::raw_body(payload) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Unreadable body: {}", e);
                None
            }
        };

        if let Some(param) = &self.config.signing_secret_param
            && let Err(response) = self.verify_signature(param, raw.as_deref(), headers).await
        {
            return response;
        }

        let body = match raw.as_deref().map(parsing::parse_event_body) {
            Some(Ok(body)) => body,
            Some(Err(e)) => {
                error!("{} ({})", MSG_BODY_NOT_FOUND, e);
                return helpers::message_response(500, MSG_BODY_NOT_FOUND);
            }
            None => {
                error!("{}", MSG_BODY_NOT_FOUND);
                return helpers::message_response(500, MSG_BODY_NOT_FOUND);
            }
        };

        if parsing::v_str(&body, &["type"]) == Some("url_verification") {
            return match parsing::v_str(&body, &["challenge"]) {
                Some(challenge) => {
                    info!("Answering URL verification challenge");
                    helpers::plain_text(challenge)
                }
                None => {
                    error!("{}", MSG_CHALLENGE_NOT_FOUND);
                    helpers::message_response(500, MSG_CHALLENGE_NOT_FOUND)
                }
            };
        }

        let has_text = parsing::v_str(&body, &["event", "text"]).is_some_and(|t| !t.is_empty());
        if !has_text {
            error!("{}", MSG_TEXT_NOT_FOUND);
            return helpers::message_response(500, MSG_TEXT_NOT_FOUND);
        }

        if parsing::v_str(&body, &["event", "type"]) != Some("app_mention") {
            info!("{}", MSG_NOT_APP_MENTION);
            return helpers::message_response(400, MSG_NOT_APP_MENTION);
        }

        let verify_token = match self.secrets.get_secret(&self.config.verify_token_param).await {
            Ok(token) => token,
            Err(e) => {
                error!("{}: {}", MSG_TOKEN_UNAVAILABLE, e);
                return helpers::message_response(500, MSG_TOKEN_UNAVAILABLE);
            }
        };

        if parsing::v_str(&body, &["token"]) != Some(verify_token.as_str()) {
            warn!("{}", MSG_INVALID_TOKEN);
            return helpers::message_response(403, MSG_INVALID_TOKEN);
        }

        match self.queue.send(body.to_string()).await {
            Ok(message_id) => {
                info!(
                    message_id = message_id.as_deref().unwrap_or(""),
                    event_id = parsing::v_str(&body, &["event_id"]).unwrap_or(""),
                    "Message sent to SQS"
                );
                helpers::message_response(200, MSG_PROCESSED)
            }
            Err(e) => {
                error!("{}", e);
                helpers::message_response(500, MSG_QUEUE_FAILED)
            }
        }
    }

    async fn verify_signature(
        &self,
        secret_param: &str,
        body: Option<&str>,
        headers: &Value,
    ) -> Result<(), Value> {
        let (Some(sig), Some(timestamp)) = (
            parsing::get_header_value(headers, "X-Slack-Signature"),
            parsing::get_header_value(headers, "X-Slack-Request-Timestamp"),
        ) else {
            error!("Missing Slack signature headers");
            return Err(helpers::message_response(403, MSG_INVALID_SIGNATURE));
        };

        let secret = self.secrets.get_secret(secret_param).await.map_err(|e| {
            error!("{}: {}", MSG_SIGNING_SECRET_UNAVAILABLE, e);
            helpers::message_response(500, MSG_SIGNING_SECRET_UNAVAILABLE)
        })?;

        if signature::verify_slack_signature(body.unwrap_or(""), timestamp, sig, &secret) {
            Ok(())
        } else {
            Err(helpers::message_response(403, MSG_INVALID_SIGNATURE))
        }
    }
}

/// Lambda entrypoint adapter for the ingress handler.
///
/// # Errors
///
/// Never fails for request-level problems; the `Result` satisfies the runtime's service signature.
pub async fn function_handler<S, Q>(
    handler: &IngressHandler<S, Q>,
    event: LambdaEvent<Value>,
) -> Result<Value, Error>
where
    S: SecretStore,
    Q: MessageQueue,
{
    let response = handler.handle(&event.payload).await;
    let status_code = response
        .get("statusCode")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    info!(
        request_id = %event.context.request_id,
        status_code,
        "API request handled"
    );
    Ok(response)
}
