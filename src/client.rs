//! HTTP client for Kodi's JSON-RPC endpoint.
//!
//! [`KodiClient`] wraps `reqwest::Client` and POSTs pre-serialized JSON-RPC
//! payloads to `http://{host}:{port}/jsonrpc`. No session state is kept
//! between calls.
//!
//! ## Error handling
//!
//! Kodi answers JSON-RPC errors with HTTP 200 and an `error` member, so the
//! body is decoded regardless of status. A body that is not a JSON-RPC
//! envelope (e.g. an HTML 401 page) becomes [`ClientError::Protocol`].

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{debug, trace};

use crate::config::ServerConfig;
use crate::rpc::ResponseEnvelope;

/// HTTP client for a single Kodi instance.
pub struct KodiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl KodiClient {
    /// Create a client for the configured host and port.
    ///
    /// A `timeout_ms` of 0 disables the timeouts.
    pub fn new(server: &ServerConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if server.timeout_ms > 0 {
            let timeout = Duration::from_millis(server.timeout_ms);
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Request)?;
        Ok(Self {
            http,
            endpoint: server.endpoint(),
        })
    }

    /// The full `/jsonrpc` URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `POST /jsonrpc` — send one serialized request and check the reply.
    pub async fn send(&self, payload: &str) -> Result<(), ClientError> {
        trace!(endpoint = %self.endpoint, payload, "sending request");
        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload.to_string())
            .send()
            .await
            .map_err(ClientError::Request)?;
        Self::handle_response(resp).await
    }

    /// Read the full body and turn a JSON-RPC error into [`ClientError::Remote`].
    async fn handle_response(resp: reqwest::Response) -> Result<(), ClientError> {
        let status = resp.status();
        let body = resp.text().await.map_err(ClientError::Request)?;

        let envelope = ResponseEnvelope::decode(&body).map_err(|e| {
            ClientError::Protocol(format!(
                "Invalid JSON-RPC response (HTTP {}): {}",
                status.as_u16(),
                e
            ))
        })?;
        debug!(
            status = status.as_u16(),
            id = ?envelope.id,
            jsonrpc = envelope.jsonrpc.as_deref().unwrap_or(""),
            "response received"
        );

        match envelope.into_error() {
            None => Ok(()),
            Some(err) => {
                debug!(code = err.code, method = %err.data.method, "remote error");
                Err(ClientError::Remote {
                    code: err.code,
                    message: err.describe(),
                })
            }
        }
    }
}

/// Errors returned by [`KodiClient::send`].
#[derive(Debug)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, DNS failure, etc.).
    Request(reqwest::Error),
    /// The response body was not a JSON-RPC envelope.
    Protocol(String),
    /// Kodi returned a non-zero JSON-RPC error code.
    Remote { code: i64, message: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Request(e) => write!(f, "HTTP request failed: {}", e),
            ClientError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            ClientError::Remote { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(e) => Some(e),
            _ => None,
        }
    }
}
