//! Bedrock Flow response streams.
//!
//! `InvokeFlow` answers with an event stream. It is exposed here as a lazy,
//! finite `Stream` of [`FlowEvent`]s that can be consumed exactly once; the
//! reply is the document of the last output event.

use aws_sdk_bedrockagentruntime::operation::invoke_flow::InvokeFlowOutput;
use aws_sdk_bedrockagentruntime::types::{FlowOutputContent, FlowResponseStream};
use aws_smithy_types::{Document, Number};
use futures::{Stream, TryStreamExt};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::errors::RelayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// A flow output node emitted a document.
    Output { document: String },
    /// The flow finished.
    Completion { reason: String },
    /// Trace and other events that carry no reply text.
    Other,
}

impl From<FlowResponseStream> for FlowEvent {
    fn from(event: FlowResponseStream) -> Self {
        match event {
            FlowResponseStream::FlowOutputEvent(output) => {
                let content: Option<FlowOutputContent> = output.content.into();
                let document = content
                    .as_ref()
                    .and_then(|c| c.as_document().ok())
                    .map(document_text)
                    .unwrap_or_default();
                FlowEvent::Output { document }
            }
            FlowResponseStream::FlowCompletionEvent(done) => FlowEvent::Completion {
                reason: format!("{:?}", done.completion_reason()),
            },
            _ => FlowEvent::Other,
        }
    }
}

/// Turns an `InvokeFlow` response into a stream of typed events.
pub fn flow_events(output: InvokeFlowOutput) -> impl Stream<Item = Result<FlowEvent, RelayError>> {
    futures::stream::unfold(Some(output), |state| async move {
        let mut output = state?;
        match output.response_stream.recv().await {
            Ok(Some(event)) => Some((Ok(FlowEvent::from(event)), Some(output))),
            Ok(None) => None,
            // Stop after the first stream error.
            Err(e) => Some((
                Err(RelayError::BackendError(format!(
                    "Bedrock Flow stream failed: {e}"
                ))),
                None,
            )),
        }
    })
}

/// Drains `events`, keeping only the document of the last output event.
///
/// # Errors
///
/// Returns the first error the stream yields.
pub async fn last_flow_output<S>(events: S) -> Result<Option<String>, RelayError>
where
    S: Stream<Item = Result<FlowEvent, RelayError>>,
{
    events
        .try_fold(None, |last, event| async move {
            Ok(match event {
                FlowEvent::Output { document } => {
                    #[cfg(feature = "debug-logs")]
                    info!("Prompt Flow Response: {}", document);
                    Some(document)
                }
                FlowEvent::Completion { reason } => {
                    info!(completion_reason = %reason, "Bedrock Flow completed");
                    last
                }
                FlowEvent::Other => {
                    debug!("Ignoring flow event without output");
                    last
                }
            })
        })
        .await
}

/// Renders a flow document as reply text: strings verbatim, anything else as JSON.
#[must_use]
pub fn document_text(doc: &Document) -> String {
    match doc {
        Document::String(s) => s.clone(),
        other => document_to_json(other).to_string(),
    }
}

fn document_to_json(doc: &Document) -> Value {
    match doc {
        Document::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), document_to_json(v)))
                .collect::<Map<String, Value>>(),
        ),
        Document::Array(items) => Value::Array(items.iter().map(document_to_json).collect()),
        Document::Number(Number::PosInt(n)) => json!(n),
        Document::Number(Number::NegInt(n)) => json!(n),
        Document::Number(Number::Float(n)) => json!(n),
        Document::String(s) => Value::String(s.clone()),
        Document::Bool(b) => Value::Bool(*b),
        Document::Null => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockagentruntime::types::{
        FlowCompletionEvent, FlowCompletionReason, FlowOutputEvent, NodeType,
    };
    use futures::StreamExt;
    use std::collections::HashMap;

    fn sdk_output(document: Document) -> FlowResponseStream {
        FlowResponseStream::FlowOutputEvent(
            FlowOutputEvent::builder()
                .node_name("FlowOutputNode")
                .node_type(NodeType::FlowOutputNode)
                .content(FlowOutputContent::Document(document))
                .build()
                .unwrap(),
        )
    }

    fn sdk_completion() -> FlowResponseStream {
        FlowResponseStream::FlowCompletionEvent(
            FlowCompletionEvent::builder()
                .completion_reason(FlowCompletionReason::Success)
                .build()
                .unwrap(),
        )
    }

    fn output(text: &str) -> Result<FlowEvent, RelayError> {
        Ok(FlowEvent::Output {
            document: text.to_string(),
        })
    }

    #[tokio::test]
    async fn test_last_output_wins() {
        let events = futures::stream::iter(vec![
            Ok(FlowEvent::Other),
            output("first"),
            Ok(FlowEvent::Other),
            output("second"),
            Ok(FlowEvent::Completion {
                reason: "Success".to_string(),
            }),
        ]);

        let last = last_flow_output(events).await.unwrap();
        assert_eq!(last.as_deref(), Some("second"));
    }

    #[test]
    fn test_sdk_events_convert_to_flow_events() {
        assert_eq!(
            FlowEvent::from(sdk_output(Document::String("answer".into()))),
            FlowEvent::Output {
                document: "answer".to_string()
            }
        );
        assert_eq!(
            FlowEvent::from(sdk_completion()),
            FlowEvent::Completion {
                reason: "Success".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_sdk_stream_folds_to_last_document() {
        let mut structured = HashMap::new();
        structured.insert("summary".to_string(), Document::String("done".into()));

        let events = futures::stream::iter(vec![
            sdk_output(Document::String("draft".into())),
            sdk_output(Document::String("answer".into())),
            sdk_completion(),
        ])
        .map(|event| Ok(FlowEvent::from(event)));
        assert_eq!(
            last_flow_output(events).await.unwrap().as_deref(),
            Some("answer")
        );

        let events = futures::stream::iter(vec![sdk_output(Document::Object(structured))])
            .map(|event| Ok(FlowEvent::from(event)));
        assert_eq!(
            last_flow_output(events).await.unwrap().as_deref(),
            Some("{\"summary\":\"done\"}")
        );
    }

    #[tokio::test]
    async fn test_stream_without_output_yields_none() {
        let events = futures::stream::iter(vec![Ok(FlowEvent::Completion {
            reason: "Success".to_string(),
        })]);
        assert_eq!(last_flow_output(events).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stream_error_is_returned() {
        let events = futures::stream::iter(vec![
            output("partial"),
            Err(RelayError::BackendError("throttled".to_string())),
            output("never seen"),
        ]);
        let err = last_flow_output(events).await.unwrap_err();
        assert!(err.to_string().contains("throttled"));
    }

    #[test]
    fn test_document_text_for_strings_and_structures() {
        assert_eq!(document_text(&Document::String("hello".into())), "hello");

        let mut map = HashMap::new();
        map.insert("answer".to_string(), Document::Number(Number::PosInt(42)));
        assert_eq!(document_text(&Document::Object(map)), "{\"answer\":42}");

        let list = Document::Array(vec![Document::Bool(true), Document::Null]);
        assert_eq!(document_text(&list), "[true,null]");
    }
}
