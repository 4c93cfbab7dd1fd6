//! Turns one queued app mention into a threaded Slack reply.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::ai::{GenerativeBackend, Invocation};
use crate::core::config::{BackendConfig, WorkerConfig};
use crate::core::models::{MentionContext, OutboundMessage};
use crate::core::secrets::SecretStore;
use crate::errors::RelayError;
use crate::slack::ChatPoster;

/// What happened to the reply of a successfully processed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Posted,
    /// The reply was generated but could not be posted; the record still counts as handled.
    PostFailed(String),
    /// The payload had no channel to reply to.
    NoChannel,
}

struct SlackTokens {
    access_token: String,
    verify_token: String,
}

/// Resolves secrets, generates a reply and posts it.
///
/// A mention without a channel is skipped before any secret read or backend call.
///
/// # Errors
///
/// Returns an error when a secret cannot be fetched or the backend call fails.
/// Posting failures are logged and reported through [`Delivery`] instead.
pub async fn reply_to_mention<S, B, P>(
    config: &WorkerConfig,
    secrets: &S,
    backend: &B,
    poster: &P,
    payload: &Value,
) -> Result<Delivery, RelayError>
where
    S: SecretStore + ?Sized,
    B: GenerativeBackend + ?Sized,
    P: ChatPoster + ?Sized,
{
    let ctx = MentionContext::from_payload(payload);
    info!(
        user = ctx.user.as_deref().unwrap_or("unknown"),
        channel = ctx.channel.as_deref().unwrap_or("unknown"),
        thread_ts = ctx.thread_ts.as_deref().unwrap_or(""),
        event_ts = ctx.event_ts.as_deref().unwrap_or(""),
        "Processing app mention"
    );

    let Some(channel) = ctx.channel.clone() else {
        warn!("Mention has no channel; skipping reply");
        return Ok(Delivery::NoChannel);
    };

    let tokens = fetch_slack_tokens(config, secrets).await?;
    let invocation = build_invocation(config, secrets, &ctx.text).await?;

    let reply = backend.generate(&invocation).await?;

    #[cfg(feature = "debug-logs")]
    info!("Generated reply: {}", reply);

    let message = OutboundMessage {
        token: tokens.verify_token,
        channel,
        text: reply,
        thread_ts: ctx.reply_anchor().map(ToString::to_string),
    };

    match poster.post_message(&tokens.access_token, &message).await {
        Ok(()) => {
            info!(channel = %message.channel, "Reply posted");
            Ok(Delivery::Posted)
        }
        Err(e) => {
            error!(channel = %message.channel, "Failed to post message to Slack: {}", e);
            Ok(Delivery::PostFailed(e.to_string()))
        }
    }
}

async fn fetch_slack_tokens<S>(config: &WorkerConfig, secrets: &S) -> Result<SlackTokens, RelayError>
where
    S: SecretStore + ?Sized,
{
    Ok(SlackTokens {
        access_token: secrets.get_secret(&config.access_token_param).await?,
        verify_token: secrets.get_secret(&config.verify_token_param).await?,
    })
}

async fn build_invocation<S>(
    config: &WorkerConfig,
    secrets: &S,
    text: &str,
) -> Result<Invocation, RelayError>
where
    S: SecretStore + ?Sized,
{
    Ok(match &config.backend {
        BackendConfig::Model(settings) => Invocation::Model {
            settings: settings.clone(),
            text: text.to_string(),
        },
        BackendConfig::Flow {
            flow_id_param,
            flow_alias_param,
            input_node,
            input_output_name,
        } => Invocation::Flow {
            flow_id: secrets.get_secret(flow_id_param).await?,
            flow_alias_id: secrets.get_secret(flow_alias_param).await?,
            input_node: input_node.clone(),
            input_output_name: input_output_name.clone(),
            text: text.to_string(),
        },
    })
}
