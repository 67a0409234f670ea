//! Request façade.
//!
//! Composes the request pipeline: derive the request identity, cancel any
//! duplicate in-flight request under that identity, attach the auth header,
//! dispatch through the transport, then either unwrap the response envelope
//! or hand transport failures to the retry loop. Each step is an explicit
//! ordered stage with defined success and error branches rather than a
//! framework hook.
//!
//! # Observability
//!
//! Uses the `tracing` crate for structured logging: request dispatch and
//! response status at `debug`, retries and auth failures at `warn`, final
//! failures at `error` (inside the retry loop).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::{ClientConfig, AUTH_HEADER};
use crate::envelope::ResponseEnvelope;
use crate::error::{Error, NetworkError, Result};
use crate::pending::{PendingRequests, Registration};
use crate::request_key::request_key;
use crate::retry::execute_with_retry;
use crate::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

/// UI busy-indicator collaborator.
///
/// Invoked around each attempt when [`RequestOptions::loading`] is set. The
/// default implementation does nothing; wire a real indicator with
/// [`HttpClient::with_loading_hook`].
pub trait LoadingHook: Send + Sync {
    /// A loading-flagged request started.
    fn on_start(&self) {}
    /// A loading-flagged request finished, successfully or not.
    fn on_finish(&self) {}
}

/// Session policy collaborator for authentication failures.
///
/// The façade only observes and propagates auth failures; what to do about
/// them (refresh, logout, redirect) is this policy's business. The error is
/// surfaced to the caller regardless.
pub trait AuthPolicy: Send + Sync {
    /// Transport-level authentication failure (401-equivalent status).
    fn on_auth_failure(&self, _status: u16) {}
    /// Envelope with the session-expired result code.
    fn on_session_expired(&self, _envelope: &ResponseEnvelope<Value>) {}
}

struct NoopHooks;

impl LoadingHook for NoopHooks {}
impl AuthPolicy for NoopHooks {}

/// Per-request configuration override.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Participate in the pending-request tracker. Default `true`.
    pub cancel: bool,
    /// Signal the UI busy indicator. Default `true`.
    pub loading: bool,
    /// Retry budget override; falls back to the client's policy.
    pub retry_count: Option<u32>,
    /// Retry delay override; falls back to the client's policy.
    pub retry_delay: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            cancel: true,
            loading: true,
            retry_count: None,
            retry_delay: None,
        }
    }
}

impl RequestOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opts this request out of duplicate cancellation.
    pub fn no_cancel(mut self) -> Self {
        self.cancel = false;
        self
    }

    /// Opts this request out of the loading indicator.
    pub fn no_loading(mut self) -> Self {
        self.loading = false;
        self
    }

    /// Overrides the retry budget for this request.
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Overrides the retry delay for this request.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}

/// Envelope-aware HTTP client with in-flight de-duplication and
/// fixed-delay retry.
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    pending: PendingRequests,
    loading: Arc<dyn LoadingHook>,
    auth_policy: Arc<dyn AuthPolicy>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client backed by the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client with a custom transport. Test seam.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config,
            pending: PendingRequests::new(),
            loading: Arc::new(NoopHooks),
            auth_policy: Arc::new(NoopHooks),
        }
    }

    /// Wires a loading-indicator collaborator.
    pub fn with_loading_hook(mut self, hook: Arc<dyn LoadingHook>) -> Self {
        self.loading = hook;
        self
    }

    /// Wires a session policy collaborator.
    pub fn with_auth_policy(mut self, policy: Arc<dyn AuthPolicy>) -> Self {
        self.auth_policy = policy;
        self
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the pending-request tracker, e.g. to `release_all` on
    /// teardown.
    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Fetches a resource; `params` become query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::GET, path, None, params, options).await
    }

    /// Creates a resource; `body` is sent as JSON.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::POST, path, body, None, options).await
    }

    /// Replaces a resource; `body` is sent as JSON.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::PUT, path, body, None, options).await
    }

    /// Removes a resource; `params` become query parameters.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::DELETE, path, None, params, options)
            .await
    }

    /// Fetches a raw binary payload via POST, skipping envelope validation.
    #[instrument(name = "http_download", skip(self, body, options), fields(path = %path))]
    pub async fn download(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Bytes> {
        let response = self
            .send_with_retry(&Method::POST, path, body.as_ref(), None, &options)
            .await?;
        Ok(response.body)
    }

    /// Shared envelope path for the typed operations.
    #[instrument(
        name = "http_request",
        skip(self, body, params, options),
        fields(method = %method, path = %path)
    )]
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        params: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        let response = self
            .send_with_retry(&method, path, body.as_ref(), params.as_ref(), &options)
            .await?;

        let envelope: ResponseEnvelope<Value> = serde_json::from_slice(&response.body)
            .map_err(|e| Error::from(e).context("failed to decode response envelope"))?;

        if envelope.is_session_expired() {
            warn!(code = %envelope.code, msg = %envelope.msg, "session expired");
            self.auth_policy.on_session_expired(&envelope);
        }

        let data = envelope.into_data()?;
        serde_json::from_value(data)
            .map_err(|e| Error::from(e).context("failed to decode response payload"))
    }

    /// Runs the dispatch pipeline under the request's retry budget. Each
    /// resubmission re-enters the pipeline, so it re-registers with the
    /// tracker and re-attaches headers.
    async fn send_with_retry(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<TransportResponse> {
        let budget = options.retry_count.unwrap_or(self.config.retry.max_retries);
        let delay = options.retry_delay.unwrap_or(self.config.retry.delay);

        execute_with_retry(budget, delay, |_| {
            self.send_once(method, path, body, params, options)
        })
        .await
    }

    /// One pipeline pass: track, dispatch, release, map status.
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<TransportResponse> {
        let key = request_key(method, path, body, params);

        // The tracker mutation completes before the first await point, so a
        // near-simultaneous duplicate cannot race this registration.
        let registration = if options.cancel {
            Some(self.pending.track(&key))
        } else {
            None
        };

        if options.loading {
            self.loading.on_start();
        }

        let result = self
            .dispatch(method, path, body, params, registration.as_ref())
            .await;

        if let Some(registration) = &registration {
            self.pending.complete(&key, registration);
        }
        if options.loading {
            self.loading.on_finish();
        }

        self.check_status(result?)
    }

    /// Races the transport against this registration's cancellation.
    /// Cancellation is cooperative: the transport is signalled to abort and
    /// the remote peer may still finish its work.
    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        params: Option<&Value>,
        registration: Option<&Registration>,
    ) -> Result<TransportResponse> {
        let request = TransportRequest {
            method: method.clone(),
            url: self.resolve_url(path),
            query: params.cloned(),
            body: body.cloned(),
            headers: self.default_headers()?,
        };

        match registration {
            Some(registration) => {
                tokio::select! {
                    biased;
                    () = registration.token().cancelled() => {
                        debug!(method = %method, path, "request cancelled");
                        Err(Error::cancelled(format!("{method} {path} superseded or released")))
                    }
                    result = self.transport.dispatch(request) => result,
                }
            }
            None => self.transport.dispatch(request).await,
        }
    }

    /// Maps a completed transport response onto the error taxonomy.
    fn check_status(&self, response: TransportResponse) -> Result<TransportResponse> {
        match response.status {
            200..=299 => Ok(response),
            status @ (401 | 403) => {
                warn!(status, "authentication failure");
                self.auth_policy.on_auth_failure(status);
                Err(Error::authentication(format!("HTTP {status}")))
            }
            408 | 504 => Err(NetworkError::Timeout.into()),
            status => {
                let preview: String = String::from_utf8_lossy(&response.body)
                    .chars()
                    .take(200)
                    .collect();
                Err(NetworkError::RequestFailed {
                    status,
                    message: preview,
                }
                .into())
            }
        }
    }

    fn resolve_url(&self, path: &str) -> String {
        let base = self.config.base_url().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.config.access_token {
            let value = HeaderValue::from_str(token)
                .map_err(|_| Error::invalid_request("access token is not a valid header value"))?;
            headers.insert(AUTH_HEADER, value);
        }
        Ok(headers)
    }
}
