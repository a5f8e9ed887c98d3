//! API response types.

use serde::Serialize;

/// Error response body for 4xx and 5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
