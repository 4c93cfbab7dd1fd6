//! Handler configuration.
//!
//! Environment variables carry SSM parameter *names*, never the secret values
//! themselves. Both configs are built through a lookup function so tests can
//! feed a map instead of mutating the process environment.

use std::env;

use crate::errors::RelayError;

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_MAX_TOKENS: i32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_FLOW_INPUT_NODE: &str = "FlowInputNode";
pub const DEFAULT_FLOW_INPUT_OUTPUT_NAME: &str = "document";
pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions posted in Slack. \
Reply in plain text that reads well as a Slack message. Be concise and answer in the language of the question.";

#[derive(Debug, Clone)]
pub struct IngressConfig {
    pub queue_url: String,
    pub verify_token_param: String,
    /// When set, requests must carry a valid Slack signature.
    pub signing_secret_param: Option<String>,
}

impl IngressConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            queue_url: required(&lookup, "SQS_QUEUE_URL")?,
            verify_token_param: required(&lookup, "SLACK_BOT_VERIFY_TOKEN")?,
            signing_secret_param: optional(&lookup, "SLACK_SIGNING_SECRET"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model_id: String,
    pub system_prompt: String,
    pub max_tokens: i32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// Single-turn Converse call against a foundation model.
    Model(ModelSettings),
    /// Bedrock Flow; identifiers are resolved from SSM at invocation time.
    Flow {
        flow_id_param: String,
        flow_alias_param: String,
        input_node: String,
        input_output_name: String,
    },
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub access_token_param: String,
    pub verify_token_param: String,
    pub backend: BackendConfig,
    pub bedrock_region: Option<String>,
    pub slack_api_base_url: String,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match (
            optional(&lookup, "FLOW_IDENTIFIER"),
            optional(&lookup, "FLOW_ALIAS_IDENTIFIER"),
        ) {
            (Some(flow_id_param), Some(flow_alias_param)) => BackendConfig::Flow {
                flow_id_param,
                flow_alias_param,
                input_node: optional(&lookup, "FLOW_INPUT_NODE")
                    .unwrap_or_else(|| DEFAULT_FLOW_INPUT_NODE.to_string()),
                input_output_name: optional(&lookup, "FLOW_INPUT_OUTPUT_NAME")
                    .unwrap_or_else(|| DEFAULT_FLOW_INPUT_OUTPUT_NAME.to_string()),
            },
            (None, None) => BackendConfig::Model(ModelSettings {
                model_id: optional(&lookup, "BEDROCK_MODEL_ID")
                    .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
                system_prompt: optional(&lookup, "BEDROCK_SYSTEM_PROMPT")
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
                max_tokens: parsed(&lookup, "BEDROCK_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: parsed(&lookup, "BEDROCK_TEMPERATURE")?
                    .unwrap_or(DEFAULT_TEMPERATURE),
            }),
            _ => {
                return Err(RelayError::ConfigError(
                    "FLOW_IDENTIFIER and FLOW_ALIAS_IDENTIFIER must be set together".to_string(),
                ));
            }
        };

        Ok(Self {
            access_token_param: required(&lookup, "SLACK_BOT_USER_ACCESS_TOKEN")?,
            verify_token_param: required(&lookup, "SLACK_BOT_VERIFY_TOKEN")?,
            backend,
            bedrock_region: optional(&lookup, "BEDROCK_REGION"),
            slack_api_base_url: optional(&lookup, "SLACK_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE_URL.to_string()),
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, RelayError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| RelayError::ConfigError(format!("{name} is not set")))
}

// Blank values count as unset.
fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<F, T>(lookup: &F, name: &str) -> Result<Option<T>, RelayError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional(lookup, name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| RelayError::ConfigError(format!("{name}: {e}")))
        })
        .transpose()
}
