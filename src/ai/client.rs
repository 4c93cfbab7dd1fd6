//! Bedrock client
//!
//! Two ways to produce a reply: a single-turn Converse call against a
//! foundation model, or an `InvokeFlow` call against a Bedrock Flow.

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client as AgentRuntimeClient;
use aws_sdk_bedrockagentruntime::types::{FlowInput, FlowInputContent};
use aws_sdk_bedrockruntime::Client as RuntimeClient;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message,
    SystemContentBlock,
};
use aws_smithy_types::Document;
use tracing::{error, info};

use super::flow::{flow_events, last_flow_output};
use crate::core::config::ModelSettings;
use crate::errors::RelayError;

/// One fully-resolved request to the generative backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Model {
        settings: ModelSettings,
        text: String,
    },
    Flow {
        flow_id: String,
        flow_alias_id: String,
        input_node: String,
        input_output_name: String,
        text: String,
    },
}

/// Produces reply text for a user's message.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the call fails or yields no text.
    async fn generate(&self, invocation: &Invocation) -> Result<String, RelayError>;
}

pub struct BedrockBackend {
    runtime: RuntimeClient,
    agent_runtime: AgentRuntimeClient,
}

impl BedrockBackend {
    #[must_use]
    pub fn new(runtime: RuntimeClient, agent_runtime: AgentRuntimeClient) -> Self {
        Self {
            runtime,
            agent_runtime,
        }
    }

    async fn converse(&self, settings: &ModelSettings, text: &str) -> Result<String, RelayError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(text.to_string()))
            .build()
            .map_err(|e| RelayError::BackendError(format!("Failed to build message: {e}")))?;

        let inference = InferenceConfiguration::builder()
            .max_tokens(settings.max_tokens)
            .temperature(settings.temperature)
            .build();

        let resp = self
            .runtime
            .converse()
            .model_id(&settings.model_id)
            .system(SystemContentBlock::Text(settings.system_prompt.clone()))
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(|e| {
                error!(model_id = %settings.model_id, "Bedrock converse failed: {}", e);
                RelayError::BackendError(format!("Bedrock model invocation failed: {e}"))
            })?;

        info!(
            model_id = %settings.model_id,
            stop_reason = ?resp.stop_reason(),
            "Bedrock converse completed"
        );

        first_text_block(resp.output()).ok_or_else(|| {
            RelayError::BackendError("Bedrock response contained no text".to_string())
        })
    }

    async fn invoke_flow(
        &self,
        flow_id: &str,
        flow_alias_id: &str,
        input_node: &str,
        input_output_name: &str,
        text: &str,
    ) -> Result<String, RelayError> {
        let input = FlowInput::builder()
            .node_name(input_node)
            .node_output_name(input_output_name)
            .content(FlowInputContent::Document(Document::String(text.to_string())))
            .build()
            .map_err(|e| RelayError::BackendError(format!("Failed to build flow input: {e}")))?;

        let output = self
            .agent_runtime
            .invoke_flow()
            .flow_identifier(flow_id)
            .flow_alias_identifier(flow_alias_id)
            .inputs(input)
            .send()
            .await
            .map_err(|e| {
                error!(flow_id = %flow_id, "Bedrock Flow invocation failed: {}", e);
                RelayError::BackendError(format!("Bedrock Flow invocation failed: {e}"))
            })?;

        last_flow_output(flow_events(output))
            .await?
            .ok_or_else(|| RelayError::BackendError("Bedrock Flow produced no output".to_string()))
    }
}

#[async_trait]
impl GenerativeBackend for BedrockBackend {
    async fn generate(&self, invocation: &Invocation) -> Result<String, RelayError> {
        match invocation {
            Invocation::Model { settings, text } => self.converse(settings, text).await,
            Invocation::Flow {
                flow_id,
                flow_alias_id,
                input_node,
                input_output_name,
                text,
            } => {
                self.invoke_flow(flow_id, flow_alias_id, input_node, input_output_name, text)
                    .await
            }
        }
    }
}

/// Returns the first text content block of a Converse response.
#[must_use]
pub fn first_text_block(output: Option<&ConverseOutput>) -> Option<String> {
    let ConverseOutput::Message(message) = output? else {
        return None;
    };
    message
        .content()
        .iter()
        .find_map(|block| block.as_text().ok())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant_message(blocks: Vec<ContentBlock>) -> ConverseOutput {
        ConverseOutput::Message(
            Message::builder()
                .role(ConversationRole::Assistant)
                .set_content(Some(blocks))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_first_text_block_picks_first_text() {
        let output = assistant_message(vec![
            ContentBlock::Text("first".to_string()),
            ContentBlock::Text("second".to_string()),
        ]);
        assert_eq!(first_text_block(Some(&output)).as_deref(), Some("first"));
    }

    #[test]
    fn test_first_text_block_handles_missing_output() {
        assert_eq!(first_text_block(None), None);
        assert_eq!(first_text_block(Some(&assistant_message(vec![]))), None);
    }
}
