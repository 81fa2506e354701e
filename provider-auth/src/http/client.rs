//! HTTP client builder shared by the provider gateways.

use log::debug;

use crate::error::Error;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("provider-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for the HTTP client used to reach AI providers.
///
/// The resulting client carries no credentials and no retry middleware:
/// each call is a single attempt, authenticated by the caller through
/// [`crate::api_key::ProviderAuth::authenticate`].
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<reqwest::Client, Error> {
        debug!("Building HTTP client (user_agent={})", self.config.user_agent);

        Ok(reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(self.config.user_agent)
            .build()?)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
