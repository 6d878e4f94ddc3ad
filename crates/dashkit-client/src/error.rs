//! Error taxonomy and normalization.
//!
//! Every failure surfaces as an [`ApiError`] carrying the uniform
//! [`ErrorDetails`] shape. Upstream bodies that provide neither a status
//! code nor a message normalize to `500` / `"Something went wrong"`.

use serde::Deserialize;
use serde_json::Value;

/// Fallback message when the upstream response provides none.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Normalized error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub status_code: u16,
    pub message: String,
    /// Upstream per-field messages, passed through verbatim.
    pub error_messages: Option<Value>,
    /// Upstream validation errors, passed through verbatim.
    pub errors: Option<Value>,
}

impl Default for ErrorDetails {
    fn default() -> Self {
        Self {
            status_code: 500,
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            error_messages: None,
            errors: None,
        }
    }
}

/// Partial upstream error body; any field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: Option<u16>,
    message: Option<String>,
    errors: Option<Value>,
}

impl ErrorDetails {
    /// Normalizes an upstream response body. `status` is the HTTP status
    /// of the failed response and wins only when the body carries no
    /// `statusCode` of its own.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed.message.filter(|m| !m.is_empty());
        Self {
            status_code: parsed.status_code.unwrap_or(status),
            error_messages: message.clone().map(Value::String),
            message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            errors: parsed.errors,
        }
    }

    /// Normalizes a transport-level failure (no response at all).
    pub fn from_transport(error: &reqwest::Error) -> Self {
        Self {
            message: error.to_string(),
            ..Self::default()
        }
    }
}

/// Client error surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// HTTP 403; never retried.
    #[error("forbidden: {}", .0.message)]
    Forbidden(ErrorDetails),

    /// The access token expired and the refresh exchange failed; the
    /// session has been torn down.
    #[error("session expired: {}", .0.message)]
    SessionExpired(ErrorDetails),

    /// Any other failed response or transport error, normalized.
    #[error("request failed ({}): {}", .0.status_code, .0.message)]
    Response(ErrorDetails),
}

impl ApiError {
    /// The normalized details, whatever the variant.
    pub fn details(&self) -> &ErrorDetails {
        match self {
            Self::Forbidden(details) | Self::SessionExpired(details) | Self::Response(details) => {
                details
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        self.details().status_code
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Response(ErrorDetails::from_transport(&error))
    }
}
