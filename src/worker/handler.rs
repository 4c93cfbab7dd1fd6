use std::collections::HashSet;

use aws_lambda_events::event::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent, SqsMessage};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::reply::{Delivery, reply_to_mention};
use crate::ai::GenerativeBackend;
use crate::core::config::WorkerConfig;
use crate::core::models::MentionContext;
use crate::core::secrets::SecretStore;
use crate::errors::RelayError;
use crate::slack::ChatPoster;

/// Outcome of one SQS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Handled(Delivery),
    /// Same Slack event already handled earlier in this batch.
    Duplicate,
    Failed(String),
}

pub struct WorkerHandler<S, B, P> {
    config: WorkerConfig,
    secrets: S,
    backend: B,
    poster: P,
}

impl<S, B, P> WorkerHandler<S, B, P>
where
    S: SecretStore,
    B: GenerativeBackend,
    P: ChatPoster,
{
    pub fn new(config: WorkerConfig, secrets: S, backend: B, poster: P) -> Self {
        Self {
            config,
            secrets,
            backend,
            poster,
        }
    }

    /// Processes every record of the batch in order.
    ///
    /// Failed records are listed in the returned partial batch response so the
    /// queue redelivers only those (and eventually dead-letters them).
    #[tracing::instrument(level = "info", skip_all, fields(records = event.records.len()))]
    pub async fn handle(&self, event: &SqsEvent) -> SqsBatchResponse {
        let mut seen = HashSet::new();
        let mut failures = Vec::new();

        for record in &event.records {
            let message_id = record.message_id.clone().unwrap_or_default();
            let outcome = self.process_record(record, &mut seen).await;

            match &outcome {
                RecordOutcome::Handled(delivery) => {
                    info!(message_id = %message_id, delivery = ?delivery, "Record handled");
                }
                RecordOutcome::Duplicate => {
                    info!(message_id = %message_id, "Skipping duplicate event in batch");
                }
                RecordOutcome::Failed(reason) => {
                    error!(message_id = %message_id, "Record failed: {}", reason);
                    if message_id.is_empty() {
                        warn!("Failed record has no message id; it cannot be reported for redelivery");
                    } else {
                        let mut failure = BatchItemFailure::default();
                        failure.item_identifier = message_id;
                        failures.push(failure);
                    }
                }
            }
        }

        let mut response = SqsBatchResponse::default();
        response.batch_item_failures = failures;
        response
    }

    /// Handles a single record; `seen` carries dedup keys across the batch.
    pub async fn process_record(
        &self,
        record: &SqsMessage,
        seen: &mut HashSet<String>,
    ) -> RecordOutcome {
        let payload = match parse_record_body(record) {
            Ok(payload) => payload,
            Err(e) => return RecordOutcome::Failed(e.to_string()),
        };

        let dedup_key = MentionContext::from_payload(&payload).dedup_key();
        if let Some(key) = &dedup_key
            && seen.contains(key)
        {
            return RecordOutcome::Duplicate;
        }

        match reply_to_mention(
            &self.config,
            &self.secrets,
            &self.backend,
            &self.poster,
            &payload,
        )
        .await
        {
            Ok(delivery) => {
                if let Some(key) = dedup_key {
                    seen.insert(key);
                }
                RecordOutcome::Handled(delivery)
            }
            Err(e) => RecordOutcome::Failed(e.to_string()),
        }
    }
}

fn parse_record_body(record: &SqsMessage) -> Result<Value, RelayError> {
    let body = record
        .body
        .as_deref()
        .ok_or_else(|| RelayError::ParseError("SQS record has no body".to_string()))?;
    serde_json::from_str(body).map_err(|e| {
        RelayError::ParseError(format!("Failed to parse SQS message body: {e}"))
    })
}

/// Lambda entrypoint adapter for the worker handler.
///
/// # Errors
///
/// Never fails; record-level failures are reported as batch item failures.
pub async fn function_handler<S, B, P>(
    handler: &WorkerHandler<S, B, P>,
    event: LambdaEvent<SqsEvent>,
) -> Result<SqsBatchResponse, Error>
where
    S: SecretStore,
    B: GenerativeBackend,
    P: ChatPoster,
{
    info!(
        request_id = %event.context.request_id,
        records = event.payload.records.len(),
        "Worker Lambda received SQS batch"
    );
    let response = handler.handle(&event.payload).await;
    info!(
        failed = response.batch_item_failures.len(),
        "Worker batch finished"
    );
    Ok(response)
}
