//! Transport boundary.
//!
//! The façade talks to the network through the [`Transport`] trait: a
//! request dispatcher accepting method, URL, body, query parameters, and
//! headers, returning status, headers, and the raw body. The default
//! implementation is backed by `reqwest`; tests substitute their own to
//! count attempts deterministically.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::{Error, NetworkError, Result};
use crate::request_key::stable_encode;

/// A single outgoing request as seen by the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL (base URL + path).
    pub url: String,
    /// Query parameters, appended with stable sorted encoding.
    pub query: Option<Value>,
    /// JSON body payload.
    pub body: Option<Value>,
    /// Request headers.
    pub headers: HeaderMap,
}

impl TransportRequest {
    /// Returns the URL with the stable-encoded query string appended.
    pub fn full_url(&self) -> String {
        let query = stable_encode(self.query.as_ref());
        if query.is_empty() {
            self.url.clone()
        } else if self.url.contains('?') {
            format!("{}&{}", self.url, query)
        } else {
            format!("{}?{}", self.url, query)
        }
    }
}

/// A raw transport response before envelope validation.
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
}

/// Request dispatcher boundary.
///
/// Implementations perform one network round trip per call; retry,
/// de-duplication, and envelope validation all live above this seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one request, resolving with the raw response or rejecting
    /// with a transport-level error.
    async fn dispatch(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// `reqwest`-backed transport.
///
/// Timeout is enforced here at the client level, not by the façade.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("request-http/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = request.full_url();
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %url, has_body = request.body.is_some(), "dispatching request");

        let response = builder.send().await.map_err(|e| {
            error!(method = %request.method, url = %url, error = %e, "request send failed");
            classify_reqwest_error(e)
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from(NetworkError::Transport(Box::new(e))))?;

        debug!(status, body_length = body.len(), "response received");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

/// Maps a `reqwest` error onto the crate's network taxonomy.
fn classify_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        NetworkError::Timeout.into()
    } else if err.is_connect() {
        NetworkError::ConnectionFailed(err.to_string()).into()
    } else {
        NetworkError::Transport(Box::new(err)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(Duration::from_secs(10));
        assert!(transport.is_ok());
    }

    #[test]
    fn test_full_url_without_query() {
        let request = TransportRequest {
            method: Method::GET,
            url: "http://localhost:3000/users".to_string(),
            query: None,
            body: None,
            headers: HeaderMap::new(),
        };
        assert_eq!(request.full_url(), "http://localhost:3000/users");
    }

    #[test]
    fn test_full_url_appends_sorted_query() {
        let request = TransportRequest {
            method: Method::GET,
            url: "http://localhost:3000/users".to_string(),
            query: Some(json!({"b": 2, "a": 1})),
            body: None,
            headers: HeaderMap::new(),
        };
        assert_eq!(request.full_url(), "http://localhost:3000/users?a=1&b=2");
    }

    #[test]
    fn test_full_url_extends_existing_query() {
        let request = TransportRequest {
            method: Method::GET,
            url: "http://localhost:3000/users?fixed=1".to_string(),
            query: Some(json!({"a": 1})),
            body: None,
            headers: HeaderMap::new(),
        };
        assert_eq!(
            request.full_url(),
            "http://localhost:3000/users?fixed=1&a=1"
        );
    }
}
