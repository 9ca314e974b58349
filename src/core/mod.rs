//! Wire types, status codes, and error classification.
//!
//! Everything in this module is pure data and works without the HTTP
//! client, so callers running their own transport can still decode
//! eVatR payloads and classify error responses.

mod classify;
mod error;
mod status;
mod types;

pub use classify::*;
pub use error::*;
pub use status::*;
pub use types::*;
