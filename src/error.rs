use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::redact::redact_credentials;

/// Optional parameters attached to an unsuccessful Bot API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before the request can be repeated (flood control)
    pub retry_after: Option<u64>,
    /// The group was migrated to a supergroup with this identifier
    pub migrate_to_chat_id: Option<i64>,
}

/// A well-formed Bot API response with `ok: false`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    /// Human readable description returned by the API
    pub message: String,
    /// Numeric error code returned by the API
    pub error_code: Option<i64>,
    /// Seconds the API asked us to wait before retrying
    pub retry_after: Option<u64>,
    /// Chat id the group was migrated to
    pub migrate_to_chat_id: Option<i64>,
}

impl ApiError {
    /// Build an API error from the fields of an unsuccessful response
    pub fn new<S: Into<String>>(
        message: S,
        error_code: Option<i64>,
        parameters: Option<ResponseParameters>,
    ) -> Self {
        let parameters = parameters.unwrap_or_default();
        ApiError {
            message: message.into(),
            error_code,
            retry_after: parameters.retry_after,
            migrate_to_chat_id: parameters.migrate_to_chat_id,
        }
    }
}

/// Error types for telegram-sender operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// API error from Telegram
    #[error("Telegram API error: {0}")]
    Api(#[from] ApiError),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] TransportError),

    /// Anything that is neither an API nor a transport failure
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Transport failure reported by reqwest.
///
/// reqwest keeps the request URL, bot token included, in both its `Display`
/// and `Debug` output. Both are redacted here, and `source()` skips the
/// reqwest level. The untouched error is reachable through [`inner`](Self::inner).
pub struct TransportError(reqwest::Error);

impl TransportError {
    /// The original reqwest error; its URL contains the bot token
    pub fn inner(&self) -> &reqwest::Error {
        &self.0
    }

    pub fn into_inner(self) -> reqwest::Error {
        self.0
    }

    pub fn is_timeout(&self) -> bool {
        self.0.is_timeout()
    }

    pub fn is_connect(&self) -> bool {
        self.0.is_connect()
    }

    pub fn is_decode(&self) -> bool {
        self.0.is_decode()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.0.status()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact_credentials(&self.0.to_string()))
    }
}

impl fmt::Debug for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact_credentials(&format!("{:?}", self.0)))
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.0)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(TransportError(e))
    }
}

impl Error {
    /// Create a new configuration error
    pub fn configuration<S: AsRef<str>>(message: S) -> Self {
        Error::Configuration(message.as_ref().to_string())
    }

    /// Create a new unexpected error
    pub fn unexpected<S: AsRef<str>>(message: S) -> Self {
        Error::Unexpected(message.as_ref().to_string())
    }

    /// The structured API error, if this is one
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Wait time requested by the API through `retry_after`
    pub fn retry_after(&self) -> Option<Duration> {
        self.as_api()
            .and_then(|api| api.retry_after)
            .map(Duration::from_secs)
    }

    /// Whether repeating the same call later may succeed.
    ///
    /// The client itself never retries; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(api) => api.retry_after.is_some(),
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Configuration(_) | Error::Unexpected(_) => false,
        }
    }
}
