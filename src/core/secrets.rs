use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use tracing::error;

use crate::errors::RelayError;

/// Read access to named, encrypted configuration values.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the value is missing or cannot be read.
    async fn get_secret(&self, name: &str) -> Result<String, RelayError>;
}

/// SSM Parameter Store backed secrets. Every call goes to SSM; nothing is cached.
pub struct SsmSecretStore {
    client: SsmClient,
}

impl SsmSecretStore {
    #[must_use]
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, RelayError> {
        let resp = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                error!(parameter = %name, "ssm get_parameter failed: {}", e);
                RelayError::SecretError(format!("ssm get_parameter {name}: {e}"))
            })?;

        resp.parameter
            .and_then(|param| param.value)
            .ok_or_else(|| RelayError::SecretError(format!("parameter {name} has no value")))
    }
}
