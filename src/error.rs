//! Error handling for `request-http`.
//!
//! All failure paths end in one of the variants below; nothing is swallowed
//! silently. The taxonomy mirrors the request lifecycle:
//!
//! ```text
//! Error
//! ├── Api            - application error envelope (non-success result code)
//! ├── Network        - transport layer failures, timeouts included (via NetworkError)
//! ├── Authentication - 401-equivalent status, never retried
//! ├── Cancelled      - request superseded or explicitly released
//! ├── Parse          - response decoding errors (via ParseError)
//! ├── InvalidRequest - invalid parameters
//! └── Context        - error with additional context
//! ```
//!
//! Large variants are boxed to keep the enum small; messages use
//! `Cow<'static, str>` so static strings do not allocate.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Result type alias for all `request-http` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Details of a rejected application error envelope.
///
/// Carries the full `{code, msg, data?}` wire envelope so callers can branch
/// on the result code (e.g. to detect session expiry).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiErrorDetails {
    /// Result code as reported by the remote service.
    pub code: String,
    /// Descriptive message from the remote service.
    pub message: String,
    /// Optional payload attached to the error envelope.
    pub data: Option<serde_json::Value>,
}

impl ApiErrorDetails {
    /// Creates new details with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Creates new details carrying the envelope's data payload.
    pub fn with_data(
        code: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}

/// Transport layer errors, hiding the underlying HTTP library types.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    /// Request completed with a non-success HTTP status.
    #[error("Request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Error message or response body preview
        message: String,
    },

    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Opaque transport error preserving the source for inspection.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// Errors raised while decoding a response.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Failed to deserialize JSON.
    #[error("Failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The primary error type for `request-http`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Application error envelope with a non-success result code.
    /// Boxed to keep the enum size small.
    #[error("API error: {0}")]
    Api(Box<ApiErrorDetails>),

    /// Network-related errors encapsulating transport layer issues.
    #[error("Network error: {0}")]
    Network(Box<NetworkError>),

    /// Authentication failure (401-equivalent). Never retried.
    #[error("Authentication error: {0}")]
    Authentication(Cow<'static, str>),

    /// Request was cancelled, typically superseded by a newer identical
    /// request or released during teardown.
    #[error("Cancelled: {0}")]
    Cancelled(Cow<'static, str>),

    /// Response decoding errors.
    #[error("Parse error: {0}")]
    Parse(Box<ParseError>),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    /// Error with additional context, preserving the chain.
    #[error("{context}")]
    Context {
        /// Context message describing what operation failed
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates an API error from a result code and message.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api(Box::new(ApiErrorDetails::new(code, message)))
    }

    /// Creates an API error carrying the envelope's data payload.
    pub fn api_with_data(
        code: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self::Api(Box::new(ApiErrorDetails::with_data(code, message, data)))
    }

    /// Creates a network error from a message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(Box::new(NetworkError::ConnectionFailed(msg.into())))
    }

    /// Creates an authentication error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn authentication(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a cancelled error.
    pub fn cancelled(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Creates an invalid request error.
    pub fn invalid_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Attaches context to an existing error.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Internal helper: iterates the error chain, penetrating Context layers.
    fn iter_chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| match err {
            Error::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        })
    }

    /// Returns the root cause of the error, skipping Context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        self.iter_chain().last().unwrap_or(self)
    }

    /// Generates a detailed error report with the full chain.
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();
        report.push_str(&self.to_string());

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            let _ = write!(report, "\nCaused by: {err}");
            current = err.source();
        }
        report
    }

    /// Checks whether this failure is eligible for automatic retry
    /// (penetrates Context layers).
    ///
    /// Only transport-level failures qualify: network errors and timeouts.
    /// Authentication failures, application error envelopes, and
    /// cancellations are never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Context { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns the rejected envelope details if this is an API error
    /// (penetrates Context layers).
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiErrorDetails> {
        match self {
            Error::Api(details) => Some(details),
            Error::Context { source, .. } => source.as_api(),
            _ => None,
        }
    }

    /// Returns the message if this is an authentication error
    /// (penetrates Context layers).
    #[must_use]
    pub fn as_authentication(&self) -> Option<&str> {
        match self {
            Error::Authentication(msg) => Some(msg.as_ref()),
            Error::Context { source, .. } => source.as_authentication(),
            _ => None,
        }
    }

    /// Returns the message if this is a cancellation
    /// (penetrates Context layers).
    #[must_use]
    pub fn as_cancelled(&self) -> Option<&str> {
        match self {
            Error::Cancelled(msg) => Some(msg.as_ref()),
            Error::Context { source, .. } => source.as_cancelled(),
            _ => None,
        }
    }
}

impl From<NetworkError> for Error {
    fn from(err: NetworkError) -> Self {
        Self::Network(Box::new(err))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(Box::new(ParseError::Json(err)))
    }
}

/// Extension trait for attaching context to `Result` values.
pub trait ContextExt<T> {
    /// Attaches a static context message.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Attaches a lazily-evaluated context message.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ContextExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::authentication("Invalid token");
        assert!(err.to_string().contains("Invalid token"));

        let err = Error::api("500", "internal failure");
        assert!(err.to_string().contains("code: 500"));
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(Error::network("connection refused").is_retryable());
        assert!(Error::from(NetworkError::Timeout).is_retryable());
        assert!(
            Error::from(NetworkError::RequestFailed {
                status: 503,
                message: "unavailable".to_string(),
            })
            .is_retryable()
        );

        assert!(!Error::authentication("expired").is_retryable());
        assert!(!Error::cancelled("superseded").is_retryable());
        assert!(!Error::api("500", "boom").is_retryable());
        assert!(!Error::invalid_request("bad params").is_retryable());
    }

    #[test]
    fn test_is_retryable_through_context() {
        let err = Error::network("reset by peer").context("fetching /users");
        assert!(err.is_retryable());

        let err = Error::authentication("nope").context("fetching /users");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_context_chain_and_report() {
        let err = Error::network("Connection refused").context("Failed to fetch /users");
        assert_eq!(err.to_string(), "Failed to fetch /users");

        let report = err.report();
        assert!(report.contains("Failed to fetch /users"));
        assert!(report.contains("Caused by:"));
        assert!(report.contains("Connection refused"));

        assert!(matches!(err.root_cause(), Error::Network(_)));
    }

    #[test]
    fn test_accessors_penetrate_context() {
        let err = Error::api_with_data("401", "session expired", serde_json::json!({"uid": 1}))
            .context("posting /login");
        let details = err.as_api().expect("api details");
        assert_eq!(details.code, "401");
        assert_eq!(details.data, Some(serde_json::json!({"uid": 1})));

        let err = Error::cancelled("superseded").context("get /users");
        assert_eq!(err.as_cancelled(), Some("superseded"));
    }

    #[test]
    fn test_result_context_ext() {
        let result: Result<()> = Err(Error::network("down"));
        let err = result.with_context(|| "loading dashboard").unwrap_err();
        assert_eq!(err.to_string(), "loading dashboard");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_size() {
        // Boxed variants keep the enum lean.
        assert!(std::mem::size_of::<Error>() <= 56);
    }
}
