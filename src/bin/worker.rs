use bedrock_bot::ai::BedrockBackend;
use bedrock_bot::core::config::WorkerConfig;
use bedrock_bot::core::secrets::SsmSecretStore;
use bedrock_bot::slack::SlackClient;
use bedrock_bot::worker::{WorkerHandler, function_handler};
use lambda_runtime::{Error, run, service_fn};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    bedrock_bot::setup_logging();

    let config = WorkerConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let aws = aws_config::load_from_env().await;
    let bedrock_aws = match &config.bedrock_region {
        Some(region) => {
            aws_config::from_env()
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await
        }
        None => aws.clone(),
    };

    let backend = BedrockBackend::new(
        aws_sdk_bedrockruntime::Client::new(&bedrock_aws),
        aws_sdk_bedrockagentruntime::Client::new(&bedrock_aws),
    );
    let secrets = SsmSecretStore::new(aws_sdk_ssm::Client::new(&aws));
    let poster = SlackClient::with_default_http(config.slack_api_base_url.clone())?;
    let handler = WorkerHandler::new(config, secrets, backend, poster);

    run(service_fn(|event| function_handler(&handler, event))).await
}
