//! Client configuration.
//!
//! Read once at client construction and immutable thereafter. There is no
//! global configuration singleton; every [`crate::client::HttpClient`] owns
//! its own copy so tests can construct isolated instances.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Name of the header carrying the access token.
pub const AUTH_HEADER: &str = "x-access-token";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Deployment environment selecting the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development.
    #[default]
    Dev,
    /// Production deployment.
    Prod,
    /// Test/staging deployment.
    Test,
}

/// Base URLs per deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    /// Development base URL.
    pub dev: String,
    /// Production base URL.
    pub prod: String,
    /// Test base URL.
    pub test: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            dev: "http://localhost:3000".to_string(),
            prod: "https://api.example.com".to_string(),
            test: "http://test-api.example.com".to_string(),
        }
    }
}

impl BaseUrls {
    /// Uses the same URL for every environment. Handy for tests pointing at
    /// a mock server.
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            dev: url.clone(),
            prod: url.clone(),
            test: url,
        }
    }

    /// Returns the base URL for the given environment.
    pub fn url_for(&self, environment: Environment) -> &str {
        match environment {
            Environment::Dev => &self.dev,
            Environment::Prod => &self.prod,
            Environment::Test => &self.test,
        }
    }
}

/// Process-wide client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deployment environment selecting the base URL.
    pub environment: Environment,
    /// Base URL per deployment environment.
    pub base_urls: BaseUrls,
    /// Request timeout, enforced by the transport layer.
    pub timeout: Duration,
    /// Default retry policy for transport failures.
    pub retry: RetryPolicy,
    /// Access token attached to every request as [`AUTH_HEADER`].
    pub access_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            base_urls: BaseUrls::default(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            access_token: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deployment environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the base URLs.
    pub fn with_base_urls(mut self, base_urls: BaseUrls) -> Self {
        self.base_urls = base_urls;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the access token attached to every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Returns the base URL selected by the configured environment.
    pub fn base_url(&self) -> &str {
        self.base_urls.url_for(self.environment)
    }
}
