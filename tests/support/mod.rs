//! In-memory stand-ins for the AWS and Slack clients.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bedrock_bot::ai::{GenerativeBackend, Invocation};
use bedrock_bot::api::MessageQueue;
use bedrock_bot::core::models::OutboundMessage;
use bedrock_bot::core::secrets::SecretStore;
use bedrock_bot::errors::RelayError;
use bedrock_bot::slack::ChatPoster;

pub const VERIFY_PARAM: &str = "/bedrock_bot/lambda/token/verify";
pub const ACCESS_PARAM: &str = "/bedrock_bot/lambda/token/access";
pub const SIGNING_PARAM: &str = "/bedrock_bot/lambda/signing_secret";
pub const FLOW_ID_PARAM: &str = "/bedrock_bot/flow/id";
pub const FLOW_ALIAS_PARAM: &str = "/bedrock_bot/flow/alias";

pub const VERIFY_TOKEN: &str = "verify-token";
pub const ACCESS_TOKEN: &str = "xoxb-access";
pub const SIGNING_SECRET: &str = "signing-secret";

// ── MockSecrets ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSecrets {
    values: Arc<Mutex<HashMap<String, String>>>,
    reads: Arc<Mutex<Vec<String>>>,
}

impl MockSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Secrets every handler needs in the happy path.
    pub fn standard() -> Self {
        Self::new()
            .with(VERIFY_PARAM, VERIFY_TOKEN)
            .with(ACCESS_PARAM, ACCESS_TOKEN)
            .with(SIGNING_PARAM, SIGNING_SECRET)
            .with(FLOW_ID_PARAM, "FLOW123")
            .with(FLOW_ALIAS_PARAM, "ALIAS456")
    }

    pub fn with(self, name: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn without(self, name: &str) -> Self {
        self.values.lock().unwrap().remove(name);
        self
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for MockSecrets {
    async fn get_secret(&self, name: &str) -> Result<String, RelayError> {
        self.reads.lock().unwrap().push(name.to_string());
        self.values
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| RelayError::SecretError(format!("ParameterNotFound: {name}")))
    }
}

// ── MockQueue ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockQueue {
    sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageQueue for MockQueue {
    async fn send(&self, body: String) -> Result<Option<String>, RelayError> {
        if self.fail {
            return Err(RelayError::QueueError("AccessDenied".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(body);
        Ok(Some(format!("msg-{}", sent.len())))
    }
}

// ── MockBackend ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockBackend {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    reply: Result<String, String>,
}

impl MockBackend {
    pub fn replying(text: &str) -> Self {
        Self {
            invocations: Arc::default(),
            reply: Ok(text.to_string()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            invocations: Arc::default(),
            reply: Err(reason.to_string()),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, invocation: &Invocation) -> Result<String, RelayError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        self.reply.clone().map_err(RelayError::BackendError)
    }
}

// ── MockPoster ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub access_token: String,
    pub message: OutboundMessage,
}

#[derive(Clone, Default)]
pub struct MockPoster {
    posts: Arc<Mutex<Vec<PostedMessage>>>,
    fail: bool,
}

impl MockPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn posts(&self) -> Vec<PostedMessage> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPoster for MockPoster {
    async fn post_message(
        &self,
        access_token: &str,
        message: &OutboundMessage,
    ) -> Result<(), RelayError> {
        self.posts.lock().unwrap().push(PostedMessage {
            access_token: access_token.to_string(),
            message: message.clone(),
        });
        if self.fail {
            return Err(RelayError::SlackError(
                "chat.postMessage error: not_in_channel".to_string(),
            ));
        }
        Ok(())
    }
}
