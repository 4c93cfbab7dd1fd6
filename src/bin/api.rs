use bedrock_bot::api::{IngressHandler, SqsQueue, function_handler};
use bedrock_bot::core::config::IngressConfig;
use bedrock_bot::core::secrets::SsmSecretStore;
use lambda_runtime::{Error, run, service_fn};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    bedrock_bot::setup_logging();

    let config = IngressConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let aws = aws_config::load_from_env().await;
    let queue = SqsQueue::new(aws_sdk_sqs::Client::new(&aws), config.queue_url.clone());
    let secrets = SsmSecretStore::new(aws_sdk_ssm::Client::new(&aws));
    let handler = IngressHandler::new(config, secrets, queue);

    run(service_fn(|event| function_handler(&handler, event))).await
}
