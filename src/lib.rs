//! # request-http
//!
//! An envelope-aware HTTP request façade: centralizes base URL and timeout
//! configuration, de-duplicates in-flight requests, injects auth headers,
//! normalizes `{code, msg, data}` response envelopes, and retries transport
//! failures with a fixed delay. Transport, TLS, and connection pooling are
//! delegated to `reqwest`.
//!
//! ## Features
//!
//! - **De-duplication**: a request with the same identity (method + path +
//!   body + params, key order ignored) as one already in flight cancels the
//!   earlier one before dispatching
//! - **Fixed-delay retry**: transport failures are resubmitted until the
//!   per-request budget is exhausted; auth failures and application error
//!   envelopes are never retried
//! - **Envelope validation**: `SUCCESS` resolves with the decoded payload,
//!   any other code rejects with the full envelope
//! - **Error Handling**: comprehensive error types with `thiserror`
//! - **Async/Await**: built on tokio; cancellation is cooperative via
//!   `CancellationToken`
//!
//! ## Example
//!
//! ```rust,no_run
//! use request_http::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let client = HttpClient::new(ClientConfig::new().with_access_token("token"))?;
//!
//! let user: serde_json::Value = client
//!     .get("/users/1", None, RequestOptions::default())
//!     .await?;
//!
//! let report = client
//!     .download("/reports/export", None, RequestOptions::new().no_loading())
//!     .await?;
//! # let _ = (user, report);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// module_name_repetitions: common pattern in Rust libraries (e.g. RetryPolicy in retry module)
// missing_errors_doc / missing_panics_doc: too verbose to document on every Result-returning function
// must_use_candidate: not all return values need #[must_use]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

// Re-exports of external dependencies
pub use bytes;
pub use reqwest;
pub use serde;
pub use serde_json;

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod pending;
pub mod request_key;
pub mod retry;
pub mod transport;

// Re-exports of core types for convenience
pub use client::{AuthPolicy, HttpClient, LoadingHook, RequestOptions};
pub use config::{BaseUrls, ClientConfig, Environment, AUTH_HEADER};
pub use envelope::{ResponseEnvelope, ResultCode};
pub use error::{ApiErrorDetails, ContextExt, Error, NetworkError, ParseError, Result};
pub use pending::{PendingRequests, Registration};
pub use retry::RetryPolicy;
pub use transport::{Transport, TransportRequest, TransportResponse};
// Re-export CancellationToken for convenient access
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use request_http::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{AuthPolicy, HttpClient, LoadingHook, RequestOptions};
    pub use crate::config::{BaseUrls, ClientConfig, Environment, AUTH_HEADER};
    pub use crate::envelope::{ResponseEnvelope, ResultCode};
    pub use crate::error::{ContextExt, Error, Result};
    pub use crate::logging::{init_logging, try_init_logging, LogConfig, LogFormat, LogLevel};
    pub use crate::pending::PendingRequests;
    pub use crate::retry::RetryPolicy;
    pub use crate::transport::{Transport, TransportRequest, TransportResponse};
    pub use serde::{Deserialize, Serialize};
    pub use tokio_util::sync::CancellationToken;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
