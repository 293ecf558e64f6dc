//! A builder for `Client`.

use chainfeed_core::ClientError;
use tracing::info;

use crate::{client::Client, config::ClientConfig, provider::Provider};

/// A builder for [`Client`].
///
/// ```no_run
/// # async fn example() -> Result<(), chainfeed_core::ClientError> {
/// use chainfeed_client::{ClientBuilder, ReplayProvider};
///
/// let client = ClientBuilder::default()
///     .endpoint("fixtures/replay")
///     .build::<ReplayProvider>()
///     .await?;
/// # client.close().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Start from an explicit configuration instead of the environment.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Sets the endpoint of the client.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the credential pair sent with every session.
    pub fn credential(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Use TLS when true (the default).
    pub fn secure(mut self, secure: bool) -> Self {
        self.config.secure = secure;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open a provider of type `P` and wrap it in a [`Client`].
    pub async fn build<P>(self) -> Result<Client<P>, ClientError>
    where
        P: Provider,
    {
        info!(endpoint = %self.config.endpoint, secure = self.config.secure, "opening client");
        let inner = P::connect(&self.config).await?;
        Ok(Client::new(inner))
    }
}

/// Reads [`ClientConfig::from_env`].
impl Default for ClientBuilder {
    fn default() -> Self {
        Self::from_config(ClientConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;

    #[test]
    fn setters_override_config() {
        let builder = ClientBuilder::from_config(ClientConfig::default())
            .endpoint("feed.example.org")
            .credential("alice", "secret")
            .secure(false);
        let config = builder.config();
        assert_eq!(config.endpoint, "feed.example.org");
        assert_eq!(config.credentials(), Some(("alice", "secret")));
        assert!(!config.secure);
    }

    #[tokio::test]
    async fn builds_a_client() {
        let client = ClientBuilder::from_config(ClientConfig::default())
            .build::<MemoryProvider>()
            .await
            .unwrap();
        assert!(client.provider().requests().is_empty());
    }
}
