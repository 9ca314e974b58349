//! # evatr
//!
//! Typed client for the eVatR service of the German Federal Central Tax
//! Office (BZSt), which confirms foreign EU VAT identification numbers
//! (USt-IdNr.) for German businesses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), evatr::Error> {
//! let client = evatr::Client::new()?;
//!
//! match client.validate_vat("DE123456789", "ATU12345678").await {
//!     Ok(resp) if resp.is_valid() => println!("valid at {}", resp.request_timestamp),
//!     Ok(resp) => println!("not valid: {}", resp.status),
//!     Err(evatr::Error::Api(e)) if e.status_code == 503 => println!("try again later"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Error`]. Only [`Error::Api`] comes from the
//! service; match on its `status` (e.g. `"evatr-2001"`, see
//! [`EvatrStatus`]) for business decisions and on `status_code` for coarse
//! handling. Input checks, transport failures, timeouts, cancellation and
//! JSON errors are separate variants.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Wire types, status codes, error classification |
//! | `client` (default) | Async HTTP client (reqwest, tokio) |
//! | `integration` | Tests against the live service |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "client")]
pub mod client;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

#[cfg(feature = "client")]
pub use crate::client::{
    CancellationToken, Client, ClientBuilder, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
    DebugTransport, GERMAN_PREFIX, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    ReqwestTransport, USER_AGENT,
};
