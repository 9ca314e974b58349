use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::debug::DebugTransport;
use super::transport::{HttpTransport, ReqwestTransport};
use super::{Client, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::core::Error;

/// Builder for [`Client`].
///
/// Every setting is independent: setting a transport keeps the timeout and
/// vice versa, regardless of call order.
///
/// ```
/// use std::time::Duration;
/// use evatr::ClientBuilder;
///
/// let client = ClientBuilder::new()
///     .base_url("https://test.example.com")
///     .timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url(), "https://test.example.com");
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Option<Duration>,
    debug: bool,
}

impl ClientBuilder {
    /// Builder with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint root. Defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the HTTP transport. Defaults to [`ReqwestTransport`].
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Upper bound for each round trip. Defaults to [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wrap the transport in a [`DebugTransport`].
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Apply the values of a [`ClientConfig`] on top of this builder.
    ///
    /// Only the settings present in `config` replace what the builder holds.
    pub fn config(mut self, config: ClientConfig) -> Self {
        if let Some(base_url) = config.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(secs) = config.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(debug) = config.debug {
            self.debug = debug;
        }
        self
    }

    /// Validate the settings and create the [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL is not an absolute http(s)
    /// URL, the timeout is zero, or the default transport cannot be built.
    pub fn build(self) -> Result<Client, Error> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "invalid base URL '{base_url}': scheme must be http or https"
            )));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let transport: Arc<dyn HttpTransport> = if self.debug {
            Arc::new(DebugTransport::new(transport))
        } else {
            transport
        };

        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            timeout,
            cancel: None,
        })
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("custom_transport", &self.transport.is_some())
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Plain-data client settings, e.g. loaded from a config file.
///
/// ```
/// let config: evatr::ClientConfig =
///     serde_json::from_str(r#"{"timeout_secs": 10, "debug": true}"#).unwrap();
/// assert_eq!(config.timeout_secs, Some(10));
/// assert_eq!(config.debug, Some(true));
/// assert_eq!(config.base_url, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint root; see [`ClientBuilder::base_url`].
    pub base_url: Option<String>,
    /// Per-request timeout in seconds; see [`ClientBuilder::timeout`].
    pub timeout_secs: Option<u64>,
    /// Request/response logging; see [`ClientBuilder::debug`].
    pub debug: Option<bool>,
}

impl ClientConfig {
    /// A builder with these settings applied to the defaults.
    pub fn into_builder(self) -> ClientBuilder {
        ClientBuilder::new().config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let client = ClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080/app/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/app");
    }

    #[test]
    fn timeout_survives_custom_transport_in_any_order() {
        let timeout = Duration::from_secs(5);

        let a = ClientBuilder::new()
            .timeout(timeout)
            .transport(ReqwestTransport::new().unwrap())
            .build()
            .unwrap();
        let b = ClientBuilder::new()
            .transport(ReqwestTransport::new().unwrap())
            .timeout(timeout)
            .build()
            .unwrap();

        assert_eq!(a.timeout(), timeout);
        assert_eq!(b.timeout(), timeout);
    }

    #[test]
    fn later_setting_wins() {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(7))
            .build()
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn invalid_base_url_rejected() {
        let err = ClientBuilder::new().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ClientBuilder::new()
            .base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = ClientBuilder::new()
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn config_applies_on_builder() {
        let config = ClientConfig {
            base_url: Some("https://test.example.com".into()),
            timeout_secs: Some(12),
            debug: None,
        };
        let client = config.into_builder().build().unwrap();
        assert_eq!(client.base_url(), "https://test.example.com");
        assert_eq!(client.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn config_without_debug_keeps_builder_debug() {
        let builder = ClientBuilder::new().debug(true).config(ClientConfig::default());
        assert!(builder.debug);

        let builder = ClientBuilder::new().debug(true).config(ClientConfig {
            debug: Some(false),
            ..ClientConfig::default()
        });
        assert!(!builder.debug);

        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 3}"#).unwrap();
        let builder = ClientBuilder::new().debug(true).config(config);
        assert!(builder.debug);
        assert_eq!(builder.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        let client = config.into_builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }
}
