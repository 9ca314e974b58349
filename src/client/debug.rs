//! Request/response logging transport.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::core::BoxError;

/// Wraps a transport and logs every exchange on the `evatr::debug` target.
///
/// Request and response (status, headers, body) are emitted as DEBUG events;
/// transport failures as WARN. The exchange itself is passed through
/// untouched, including the response body.
///
/// Enable with e.g. `RUST_LOG=evatr::debug=debug`.
#[derive(Debug, Clone)]
pub struct DebugTransport<T> {
    inner: T,
}

impl<T: HttpTransport> DebugTransport<T> {
    /// Wrap `inner`; every exchange is logged on target `evatr::debug`.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// The wrapped transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for DebugTransport<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        debug!(
            target: "evatr::debug",
            method = request.method.as_str(),
            url = %request.url,
            headers = ?request.headers,
            body = %lossy(request.body.as_deref()),
            "=== REQUEST ==="
        );

        match self.inner.execute(request).await {
            Ok(resp) => {
                debug!(
                    target: "evatr::debug",
                    status = resp.status,
                    headers = ?resp.headers,
                    body = %lossy(Some(&resp.body[..])),
                    "=== RESPONSE ==="
                );
                Ok(resp)
            }
            Err(e) => {
                warn!(target: "evatr::debug", error = %e, "=== ERROR ===");
                Err(e)
            }
        }
    }
}

fn lossy(body: Option<&[u8]>) -> std::borrow::Cow<'_, str> {
    match body {
        Some(bytes) => String::from_utf8_lossy(bytes),
        None => std::borrow::Cow::Borrowed(""),
    }
}
