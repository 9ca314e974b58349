//! Mapping of non-2xx responses to [`ApiError`].

use super::error::ApiError;
use super::types::ErrorResponse;

/// Build an [`ApiError`] from a non-2xx status and its raw body.
///
/// The body is decoded as [`ErrorResponse`] when possible. If it is empty,
/// not JSON, or carries no message, the message falls back to
/// [`default_message`]. Never fails.
pub fn classify_error(status_code: u16, body: &[u8]) -> ApiError {
    let (status, message) = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(resp) => (resp.status, resp.message),
        Err(_) => (String::new(), String::new()),
    };

    let message = if message.is_empty() {
        default_message(status_code, &status)
    } else {
        message
    };

    ApiError {
        status_code,
        status,
        message,
    }
}

/// Fallback message for an HTTP status.
pub fn default_message(status_code: u16, status: &str) -> String {
    match status_code {
        400 => "Bad request: Invalid input parameters".into(),
        403 => "Forbidden: Not authorized to perform this request".into(),
        404 => "Not found: VAT ID not found or requesting VAT ID invalid".into(),
        500 => "Internal server error: Processing temporarily not possible".into(),
        503 => "Service unavailable: Please try again later".into(),
        _ => format!("Unexpected error (HTTP {status_code}): {status}"),
    }
}
