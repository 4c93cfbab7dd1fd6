//! bedrock-bot - a Slack bot that answers app mentions with Amazon Bedrock.
//!
//! This crate implements a two-Lambda architecture:
//! 1. An API Lambda that receives Slack Events API callbacks, filters Slack
//!    retries, checks the verify token and queues app mentions on SQS
//! 2. A Worker Lambda that consumes the queue, asks Bedrock (a model or a
//!    Bedrock Flow) for a reply and posts it back into the Slack thread
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - SQS between the two Lambdas, with partial batch failures feeding the dead-letter queue
//! - SSM Parameter Store for Slack tokens and flow identifiers
//! - Bedrock Converse / `InvokeFlow` for generation
//! - Tokio for async runtime
//!
//! Handlers receive their configuration and clients at construction, so they
//! can be driven in tests with in-memory implementations of
//! [`core::secrets::SecretStore`], [`api::MessageQueue`],
//! [`ai::GenerativeBackend`] and [`slack::ChatPoster`].
//!
//! # Example
//!
//! ```no_run
//! use bedrock_bot::api::{IngressHandler, SqsQueue};
//! use bedrock_bot::core::config::IngressConfig;
//! use bedrock_bot::core::secrets::SsmSecretStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     bedrock_bot::setup_logging();
//!
//!     let config = IngressConfig {
//!         queue_url: "https://sqs.us-east-1.amazonaws.com/123456789012/bot".to_string(),
//!         verify_token_param: "/bedrock_bot/lambda/token/verify".to_string(),
//!         signing_secret_param: None,
//!     };
//!     let aws = aws_config::load_from_env().await;
//!     let queue = SqsQueue::new(aws_sdk_sqs::Client::new(&aws), config.queue_url.clone());
//!     let handler = IngressHandler::new(config, SsmSecretStore::new(aws_sdk_ssm::Client::new(&aws)), queue);
//!
//!     let response = handler
//!         .handle(&serde_json::json!({
//!             "body": "{\"type\":\"url_verification\",\"challenge\":\"abc\"}"
//!         }))
//!         .await;
//!     println!("{response}");
//!     Ok(())
//! }
//! ```
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod slack;
pub mod worker;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to stdout for `CloudWatch` Logs. The level filter comes from
/// `RUST_LOG` and defaults to `info`. Calling this more than once is harmless;
/// only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// bedrock_bot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
