//! The boundary response shape and error rendering.

use serde_json::{json, Value};

use huddle_protocol::ErrorCode;

/// A structured boundary response: an HTTP-style status and a JSON
/// body. Failures are always a body with a machine-readable `error`
/// code, never an opaque error — internal state does not leak out.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// A 200 response with the given body.
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// An error response for the given code.
    pub fn error(code: ErrorCode) -> Self {
        Self {
            status: code.status(),
            body: json!({ "error": code.as_str() }),
        }
    }

    /// The 429 response, carrying the wait hint.
    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            status: ErrorCode::RateLimited.status(),
            body: json!({
                "error": ErrorCode::RateLimited.as_str(),
                "retry_after": retry_after,
            }),
        }
    }
}
