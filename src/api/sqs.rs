use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;

use crate::errors::RelayError;

/// Producer side of the relay queue.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Sends one message body; returns the queue-assigned message id when known.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent.
    async fn send(&self, body: String) -> Result<Option<String>, RelayError>;
}

pub struct SqsQueue {
    client: SqsClient,
    queue_url: String,
}

impl SqsQueue {
    #[must_use]
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send(&self, body: String) -> Result<Option<String>, RelayError> {
        let resp = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| RelayError::QueueError(format!("Failed to send message to SQS: {e}")))?;
        Ok(resp.message_id)
    }
}
