//! Async client for the eVatR REST API.
//!
//! Every public operation performs at most one HTTP round trip. Nothing is
//! retried or cached; a 503 reaches the caller as [`Error::Api`] with
//! `status_code == 503`, and what to do about it is the caller's decision.

mod config;
mod debug;
mod info;
mod transport;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use config::{ClientBuilder, ClientConfig};
pub use debug::DebugTransport;
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use validation::GERMAN_PREFIX;

use crate::core::{Error, classify_error};

/// Production endpoint of the eVatR service.
pub const DEFAULT_BASE_URL: &str = "https://api.evatr.vies.bzst.de/app";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("evatr-rs/", env!("CARGO_PKG_VERSION"));

/// eVatR API client.
///
/// Cheap to clone; clones share the underlying transport. Safe to use from
/// many tasks at once.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    cancel: Option<CancellationToken>,
}

impl Client {
    /// Client with default settings against the production service.
    pub fn new() -> Result<Self, Error> {
        ClientBuilder::new().build()
    }

    /// Start configuring a client; see [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Endpoint root, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upper bound applied to each round trip.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A client whose requests abort with [`Error::Cancelled`] once `token`
    /// is cancelled. Requests started after cancellation fail immediately.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    /// Send a request and decode a 2xx JSON body into `R`.
    async fn request_json<B, R>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let bytes = self.execute(method, path, body).await?;
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    /// Send a request and return the raw 2xx body.
    ///
    /// Non-2xx responses are classified into [`Error::Api`] and their body is
    /// never decoded as the success shape.
    async fn execute<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<Bytes, Error>
    where
        B: Serialize + ?Sized,
    {
        let mut headers = vec![
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        let body = match body {
            Some(b) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(Bytes::from(serde_json::to_vec(b).map_err(Error::Encode)?))
            }
            None => None,
        };

        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        };

        let exchange = tokio::time::timeout(self.timeout, self.transport.execute(request));
        let outcome = match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return Err(Error::Cancelled),
                    outcome = exchange => outcome,
                }
            }
            None => exchange.await,
        };
        let response = outcome
            .map_err(|_| Error::Timeout(self.timeout))?
            .map_err(Error::Transport)?;

        tracing::debug!(
            method = method.as_str(),
            path,
            status = response.status,
            "evatr request completed"
        );

        if response.is_success() {
            return Ok(response.body);
        }

        let err = classify_error(response.status, &response.body);
        tracing::warn!(
            method = method.as_str(),
            path,
            http_status = err.status_code,
            status = %err.status,
            "evatr request failed"
        );
        Err(err.into())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}
