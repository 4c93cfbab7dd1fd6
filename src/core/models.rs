use serde::Serialize;
use serde_json::Value;

use crate::api::parsing::v_str;

/// Conversation context pulled out of a queued `app_mention` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionContext {
    pub event_id: Option<String>,
    pub user: Option<String>,
    pub text: String,
    pub channel: Option<String>,
    pub thread_ts: Option<String>,
    pub event_ts: Option<String>,
}

impl MentionContext {
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| v_str(payload, &["event", name]).map(ToString::to_string);

        Self {
            event_id: v_str(payload, &["event_id"]).map(ToString::to_string),
            user: field("user"),
            text: field("text").unwrap_or_default(),
            channel: field("channel"),
            thread_ts: field("thread_ts"),
            event_ts: field("event_ts"),
        }
    }

    /// Thread to reply in: the explicit thread, else the mention itself.
    #[must_use]
    pub fn reply_anchor(&self) -> Option<&str> {
        self.thread_ts.as_deref().or(self.event_ts.as_deref())
    }

    /// Key used to suppress duplicate deliveries inside one batch.
    #[must_use]
    pub fn dedup_key(&self) -> Option<String> {
        if let Some(id) = &self.event_id {
            return Some(id.clone());
        }
        match (&self.channel, &self.event_ts) {
            (Some(channel), Some(ts)) => Some(format!("{channel}:{ts}")),
            _ => None,
        }
    }
}

/// Body of a `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub token: String,
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}
