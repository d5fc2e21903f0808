//! Client builder for constructing [`SplunkClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, redirects, TLS verification)
//! - Converting a loaded [`Config`] into client settings
//!
//! # Invariants
//! - `base_url` is required and must be provided before calling `build()`
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use std::time::Duration;

use secrecy::SecretString;
use splunk_dispatch_config::{
    Config,
    constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS},
};

use crate::client::SplunkClient;
use crate::error::{ClientError, Result};
use crate::jobs::PollPolicy;
use crate::metrics::MetricsCollector;
use crate::namespace::Namespace;

/// Builder for creating a new [`SplunkClient`].
pub struct SplunkClientBuilder {
    base_url: Option<String>,
    auth_token: Option<SecretString>,
    skip_verify: bool,
    timeout: Duration,
    max_retries: usize,
    metrics: Option<MetricsCollector>,
    poll_policy: PollPolicy,
    namespace: Namespace,
}

impl Default for SplunkClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            metrics: None,
            poll_policy: PollPolicy::default(),
            namespace: Namespace::system(),
        }
    }
}

impl SplunkClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL, including scheme and port (e.g. `https://localhost:8089`).
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the bearer token sent with every request.
    pub fn api_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Skip TLS certificate verification. Development use only.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the per-request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget for rate-limited (HTTP 429) requests.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Pre-configure the builder from loaded configuration.
    ///
    /// ```rust,ignore
    /// let config = ConfigLoader::new().load_dotenv()?.from_env()?.build()?;
    /// let client = SplunkClient::builder().from_config(&config).build()?;
    /// ```
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.connection.base_url.clone());
        self.auth_token = config.auth.token.clone();
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.max_retries = config.connection.max_retries;
        self.namespace = Namespace::from_parts(
            config.namespace.owner.as_deref(),
            config.namespace.app.as_deref(),
        );
        self.poll_policy = PollPolicy {
            interval: config.polling.poll_interval,
            max_interval: config.polling.max_poll_interval,
            max_wait: config.polling.max_wait_secs.map(Duration::from_secs),
            ..PollPolicy::default()
        };
        self
    }

    /// Remove trailing slashes so endpoint paths join cleanly.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`SplunkClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided,
    /// [`ClientError::Configuration`] for an unusable poll policy, and
    /// `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<SplunkClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        self.poll_policy.validate()?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        Ok(SplunkClient {
            http,
            base_url,
            auth_token: self.auth_token,
            max_retries: self.max_retries,
            metrics: self.metrics,
            poll_policy: self.poll_policy,
            namespace: self.namespace,
        })
    }
}
